use shared_types::{LeadFilterParams, ListLeadsResponse};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

struct CachedPage {
    response: ListLeadsResponse,
}

/// Cache of computed lead pages keyed by (filters, page, page_size).
///
/// A generation counter resolves the superseded-fetch race: callers snapshot
/// the generation with `begin` before fetching, and `store` drops any result
/// whose snapshot predates the latest invalidation.
pub struct LeadQueryCache {
    generation: AtomicU64,
    entries: Mutex<HashMap<String, CachedPage>>,
}

impl LeadQueryCache {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn key(filters: &LeadFilterParams, page: usize, page_size: usize) -> String {
        serde_json::to_string(&(filters, page, page_size)).unwrap_or_default()
    }

    /// Snapshot the generation before starting a fetch.
    pub fn begin(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn get(&self, key: &str) -> Option<ListLeadsResponse> {
        let entries = self.entries.lock().await;
        entries.get(key).map(|cached| cached.response.clone())
    }

    /// Returns false (and stores nothing) when an invalidation happened after
    /// `generation` was snapshotted.
    pub async fn store(&self, key: String, response: ListLeadsResponse, generation: u64) -> bool {
        let mut entries = self.entries.lock().await;
        if generation != self.generation.load(Ordering::SeqCst) {
            return false;
        }
        entries.insert(key, CachedPage { response });
        true
    }

    /// Bumps the generation and drops every cached page. Called by the
    /// realtime bridge on any change event.
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.lock().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        entries.clear();
    }
}

impl Default for LeadQueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(total: i64) -> ListLeadsResponse {
        ListLeadsResponse {
            leads: Vec::new(),
            total_count: total,
            page: 0,
            page_size: 20,
        }
    }

    #[tokio::test]
    async fn store_then_get_round_trips() {
        let cache = LeadQueryCache::new();
        let key = LeadQueryCache::key(&LeadFilterParams::default(), 0, 20);

        let generation = cache.begin();
        assert!(cache.store(key.clone(), response(3), generation).await);
        assert_eq!(cache.get(&key).await.map(|r| r.total_count), Some(3));
    }

    #[tokio::test]
    async fn invalidation_discards_stale_stores() {
        let cache = LeadQueryCache::new();
        let key = LeadQueryCache::key(&LeadFilterParams::default(), 0, 20);

        let generation = cache.begin();
        cache.invalidate_all().await;

        // The fetch that started before the invalidation must be dropped.
        assert!(!cache.store(key.clone(), response(3), generation).await);
        assert!(cache.get(&key).await.is_none());

        let fresh = cache.begin();
        assert!(cache.store(key.clone(), response(4), fresh).await);
        assert_eq!(cache.get(&key).await.map(|r| r.total_count), Some(4));
    }

    #[tokio::test]
    async fn invalidation_clears_existing_entries() {
        let cache = LeadQueryCache::new();
        let key = LeadQueryCache::key(&LeadFilterParams::default(), 1, 20);
        let generation = cache.begin();
        cache.store(key.clone(), response(9), generation).await;

        cache.invalidate_all().await;
        assert!(cache.get(&key).await.is_none());
    }

    #[test]
    fn keys_distinguish_filters_and_pages() {
        let base = LeadQueryCache::key(&LeadFilterParams::default(), 0, 20);
        let other_page = LeadQueryCache::key(&LeadFilterParams::default(), 1, 20);
        let filters = LeadFilterParams {
            search: Some("maid".to_string()),
            ..Default::default()
        };
        let filtered = LeadQueryCache::key(&filters, 0, 20);

        assert_ne!(base, other_page);
        assert_ne!(base, filtered);
    }
}
