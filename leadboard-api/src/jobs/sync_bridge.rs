use crate::database::{ChangeEvent, ChangeKind};
use crate::helpers::query_cache::LeadQueryCache;
use chrono::Utc;
use shared_types::LeadNotification;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const MAX_NOTIFICATIONS: usize = 50;

/// Consumes the change feed: every event invalidates the lead-page cache so
/// consumers refetch; inserts additionally surface a transient notification.
/// One subscription per bridge lifetime; the loop ends when the feed closes.
pub struct RealtimeBridge {
    cache: Arc<LeadQueryCache>,
    notifications: Arc<Mutex<VecDeque<LeadNotification>>>,
}

impl RealtimeBridge {
    pub fn new(cache: Arc<LeadQueryCache>) -> Self {
        Self {
            cache,
            notifications: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Newest first.
    pub async fn recent_notifications(&self) -> Vec<LeadNotification> {
        let notifications = self.notifications.lock().await;
        notifications.iter().cloned().collect()
    }

    pub fn spawn(self: &Arc<Self>, receiver: broadcast::Receiver<ChangeEvent>) -> JoinHandle<()> {
        let bridge = self.clone();
        tokio::spawn(async move { bridge.run(receiver).await })
    }

    async fn run(&self, mut receiver: broadcast::Receiver<ChangeEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.handle_event(event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Change feed lagged, {} events skipped", skipped);
                    // Events were lost, so anything cached may be stale.
                    self.cache.invalidate_all().await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::info!("Change feed closed, realtime bridge stopped");
    }

    async fn handle_event(&self, event: ChangeEvent) {
        self.cache.invalidate_all().await;

        if event.kind == ChangeKind::Insert {
            let lead = event.lead;
            tracing::info!(
                name = %lead.name,
                source = lead.source.as_deref().unwrap_or("unknown"),
                "New lead arrived"
            );

            let mut notifications = self.notifications.lock().await;
            if notifications.len() == MAX_NOTIFICATIONS {
                notifications.pop_back();
            }
            notifications.push_front(LeadNotification {
                lead_id: lead.id,
                name: lead.name,
                source: lead.source,
                service_required: lead.service_required,
                received_at: Utc::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared_types::{Lead, LeadFilterParams, LeadPriority, LeadStatus, ListLeadsResponse, SourceTable};

    fn lead(name: &str) -> Lead {
        Lead {
            id: "1".to_string(),
            source_table: SourceTable::Leads,
            created_at: Utc::now(),
            updated_at: None,
            name: name.to_string(),
            phone: None,
            email: None,
            city: None,
            source: Some("Website".to_string()),
            campaign: None,
            service_required: Some("Maid".to_string()),
            status: LeadStatus::New,
            assigned_to: None,
            notes: None,
            message: None,
            specific_requirements: None,
            last_contacted_at: None,
            next_followup_at: None,
            priority: LeadPriority::Medium,
            score: None,
        }
    }

    #[tokio::test]
    async fn insert_event_invalidates_cache_and_records_notification() {
        let cache = Arc::new(LeadQueryCache::new());
        let key = LeadQueryCache::key(&LeadFilterParams::default(), 0, 20);
        let generation = cache.begin();
        cache
            .store(
                key.clone(),
                ListLeadsResponse { leads: Vec::new(), total_count: 1, page: 0, page_size: 20 },
                generation,
            )
            .await;

        let bridge = RealtimeBridge::new(cache.clone());
        bridge
            .handle_event(ChangeEvent {
                kind: ChangeKind::Insert,
                table: SourceTable::Leads,
                lead: lead("Asha"),
            })
            .await;

        assert!(cache.get(&key).await.is_none());
        let notifications = bridge.recent_notifications().await;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].name, "Asha");
        assert_eq!(notifications[0].service_required.as_deref(), Some("Maid"));
    }

    #[tokio::test]
    async fn update_event_only_invalidates() {
        let cache = Arc::new(LeadQueryCache::new());
        let bridge = RealtimeBridge::new(cache.clone());

        bridge
            .handle_event(ChangeEvent {
                kind: ChangeKind::Update,
                table: SourceTable::HireHelperLeads,
                lead: lead("Ravi"),
            })
            .await;

        assert!(bridge.recent_notifications().await.is_empty());
    }

    #[tokio::test]
    async fn bridge_runs_until_feed_closes() {
        let cache = Arc::new(LeadQueryCache::new());
        let bridge = Arc::new(RealtimeBridge::new(cache));
        let (tx, rx) = broadcast::channel(4);

        let handle = bridge.spawn(rx);
        tx.send(ChangeEvent {
            kind: ChangeKind::Insert,
            table: SourceTable::Leads,
            lead: lead("Meena"),
        })
        .expect("send");
        drop(tx);

        handle.await.expect("bridge task");
        assert_eq!(bridge.recent_notifications().await.len(), 1);
    }

    #[tokio::test]
    async fn notification_ring_is_bounded() {
        let cache = Arc::new(LeadQueryCache::new());
        let bridge = RealtimeBridge::new(cache);

        for i in 0..(MAX_NOTIFICATIONS + 5) {
            bridge
                .handle_event(ChangeEvent {
                    kind: ChangeKind::Insert,
                    table: SourceTable::Leads,
                    lead: lead(&format!("Lead {i}")),
                })
                .await;
        }

        let notifications = bridge.recent_notifications().await;
        assert_eq!(notifications.len(), MAX_NOTIFICATIONS);
        // Newest first, oldest dropped.
        assert_eq!(notifications[0].name, format!("Lead {}", MAX_NOTIFICATIONS + 4));
    }
}
