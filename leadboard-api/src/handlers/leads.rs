use actix_web::{web, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared_types::{
    CreateLeadRequest, Lead, LeadFilterParams, LeadPriority, LeadStatus, ListLeadsResponse,
    SourceTable, UpdateLeadRequest,
};
use std::sync::Arc;

use crate::database::leads as leads_db;
use crate::database::leads::RawLeadRow;
use crate::database::Database;
use crate::helpers::query_cache::LeadQueryCache;
use crate::leads::{filter, normalize, options, scoring, stats};

/// Query-string form of the filter descriptor. Multi-value fields are
/// comma-separated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListLeadsQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub source: Option<String>,
    pub service_required: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub overdue: Option<bool>,
    pub attention: Option<bool>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

fn csv(raw: Option<String>) -> Option<Vec<String>> {
    raw.map(|s| {
        s.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
    })
    .filter(|parts: &Vec<String>| !parts.is_empty())
}

impl ListLeadsQuery {
    pub fn into_parts(self) -> (LeadFilterParams, usize, usize) {
        // Unrecognized status/priority values are dropped rather than mapped
        // to a default, so `status=bogus` matches nothing instead of every
        // New lead. An empty set after dropping stays an active constraint.
        let filters = LeadFilterParams {
            status: csv(self.status)
                .map(|v| v.iter().filter_map(|s| LeadStatus::try_from_raw(s)).collect()),
            search: self.search.filter(|s| !s.trim().is_empty()),
            city: csv(self.city),
            source: csv(self.source),
            service_required: csv(self.service_required),
            assigned_to: csv(self.assigned_to),
            priority: csv(self.priority)
                .map(|v| v.iter().filter_map(|s| LeadPriority::try_from_raw(s)).collect()),
            date_from: self.date_from,
            date_to: self.date_to,
            overdue: self.overdue.unwrap_or(false),
            attention: self.attention.unwrap_or(false),
        };
        let page = self.page.unwrap_or(0);
        let page_size = self.page_size.unwrap_or(filter::DEFAULT_PAGE_SIZE).max(1);
        (filters, page, page_size)
    }
}

async fn fetch_merged(db: &Database) -> anyhow::Result<Vec<Lead>> {
    let rows = leads_db::fetch_all_rows(db.async_connection.clone()).await?;
    Ok(rows.into_iter().map(normalize::normalize).collect())
}

fn with_score(mut lead: Lead) -> Lead {
    lead.score = Some(scoring::calculate_score(&lead));
    lead
}

pub async fn list_leads(
    db: web::Data<Arc<Database>>,
    cache: web::Data<Arc<LeadQueryCache>>,
    query: web::Query<ListLeadsQuery>,
) -> ActixResult<HttpResponse> {
    let (filters, page, page_size) = query.into_inner().into_parts();
    let key = LeadQueryCache::key(&filters, page, page_size);

    if let Some(cached) = cache.get(&key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let generation = cache.begin();
    let leads = fetch_merged(&db)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let result = filter::filter_sort_paginate(leads, &filters, page, page_size, Utc::now());
    let response = ListLeadsResponse {
        leads: result.leads.into_iter().map(with_score).collect(),
        total_count: result.total_count,
        page,
        page_size,
    };

    cache.store(key, response.clone(), generation).await;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_lead(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let lead_id = path.into_inner();

    let row = leads_db::get_lead_row(db.async_connection.clone(), &lead_id)
        .await
        .map_err(|e| actix_web::error::ErrorNotFound(e.to_string()))?;

    Ok(HttpResponse::Ok().json(with_score(normalize::normalize(RawLeadRow::Leads(row)))))
}

pub async fn create_lead(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateLeadRequest>,
) -> ActixResult<HttpResponse> {
    let row = leads_db::insert_lead(&db, &request.into_inner())
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(with_score(normalize::normalize(RawLeadRow::Leads(row)))))
}

pub async fn update_lead(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    request: web::Json<UpdateLeadRequest>,
) -> ActixResult<HttpResponse> {
    let lead_id = path.into_inner();
    let request = request.into_inner();
    // Provenance decides the write target; absent means the primary table.
    let table = request.source_table.unwrap_or(SourceTable::Leads);

    let row = leads_db::update_lead(&db, table, &lead_id, &request)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(with_score(normalize::normalize(row))))
}

pub async fn lead_stats(
    db: web::Data<Arc<Database>>,
    query: web::Query<ListLeadsQuery>,
) -> ActixResult<HttpResponse> {
    let (filters, _page, _page_size) = query.into_inner().into_parts();
    let mut leads = fetch_merged(&db)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    // Stats cover the whole filtered set, never a single page of it.
    let now = Utc::now();
    leads.retain(|lead| filter::matches(lead, &filters, now));
    let total_count = leads.len() as i64;
    let stats = stats::compute_stats(&leads, total_count, now);

    Ok(HttpResponse::Ok().json(stats))
}

pub async fn filter_options(db: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let leads = fetch_merged(&db)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(options::filter_options(&leads)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_splits_and_drops_empties() {
        assert_eq!(
            csv(Some("Pune, Mumbai,,".to_string())),
            Some(vec!["Pune".to_string(), "Mumbai".to_string()])
        );
        assert_eq!(csv(Some("  ".to_string())), None);
        assert_eq!(csv(None), None);
    }

    #[test]
    fn query_maps_to_filter_params() {
        let query = ListLeadsQuery {
            status: Some("New,Contacted".to_string()),
            priority: Some("high".to_string()),
            attention: Some(true),
            page_size: Some(0),
            ..Default::default()
        };
        let (filters, page, page_size) = query.into_parts();
        assert_eq!(
            filters.status,
            Some(vec![LeadStatus::New, LeadStatus::Contacted])
        );
        assert_eq!(filters.priority, Some(vec![LeadPriority::High]));
        assert!(filters.attention);
        assert_eq!(page, 0);
        // A zero page size is clamped rather than dividing by nothing.
        assert_eq!(page_size, 1);
    }

    #[test]
    fn unknown_filter_values_are_dropped_not_defaulted() {
        let query = ListLeadsQuery {
            status: Some("bogus".to_string()),
            priority: Some("high,urgent".to_string()),
            ..Default::default()
        };
        let (filters, _, _) = query.into_parts();
        // "bogus" must not turn into a filter for New leads.
        assert_eq!(filters.status, Some(vec![]));
        assert_eq!(filters.priority, Some(vec![LeadPriority::High]));
    }
}
