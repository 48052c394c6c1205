use chrono::{DateTime, Duration, NaiveDate, Utc};
use shared_types::{AnalyticsData, FrequencyEntry, FunnelStep, Lead, LeadStatus, TrendPoint};
use std::collections::{BTreeMap, HashMap};

/// Trend window used when the input holds no leads at all.
pub const FALLBACK_TREND_DAYS: i64 = 30;

fn frequency_table(map: BTreeMap<String, i64>) -> Vec<FrequencyEntry> {
    map.into_iter()
        .map(|(name, value)| FrequencyEntry { name, value })
        .collect()
}

/// Buckets a window of leads into chart-ready series plus textual insights.
/// Deterministic for a given window and `now`.
pub fn aggregate(leads: &[Lead], now: DateTime<Utc>) -> AnalyticsData {
    let today = now.date_naive();

    // Zero-fill one entry per calendar day from the earliest lead through
    // today, so gaps show as zeros in the chart.
    let start = leads
        .iter()
        .map(|l| l.created_at.date_naive())
        .min()
        .unwrap_or(today - Duration::days(FALLBACK_TREND_DAYS - 1));

    let mut volume: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    let mut day = start;
    while day <= today {
        volume.insert(day, 0);
        day += Duration::days(1);
    }

    let mut by_source: BTreeMap<String, i64> = BTreeMap::new();
    let mut by_city: BTreeMap<String, i64> = BTreeMap::new();
    let mut by_service: BTreeMap<String, i64> = BTreeMap::new();
    let mut status_counts: HashMap<LeadStatus, i64> = HashMap::new();

    for lead in leads {
        *volume.entry(lead.created_at.date_naive()).or_insert(0) += 1;

        if let Some(source) = lead.source.as_deref().filter(|s| !s.is_empty()) {
            *by_source.entry(source.to_string()).or_insert(0) += 1;
        }
        if let Some(city) = lead.city.as_deref().filter(|c| !c.is_empty()) {
            *by_city.entry(city.to_string()).or_insert(0) += 1;
        }
        if let Some(service) = lead.service_required.as_deref().filter(|s| !s.is_empty()) {
            *by_service.entry(service.to_string()).or_insert(0) += 1;
        }
        *status_counts.entry(lead.status).or_insert(0) += 1;
    }

    let volume_trend = volume
        .into_iter()
        .map(|(date, count)| TrendPoint {
            date: date.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect();

    let status_count = |status: LeadStatus| status_counts.get(&status).copied().unwrap_or(0);

    // Raw per-status distribution, not cumulative.
    let funnel = vec![
        FunnelStep { step: "New".to_string(), count: status_count(LeadStatus::New) },
        FunnelStep { step: "Contacted".to_string(), count: status_count(LeadStatus::Contacted) },
        FunnelStep { step: "Qualified".to_string(), count: status_count(LeadStatus::Qualified) },
        FunnelStep { step: "Trial".to_string(), count: status_count(LeadStatus::TrialScheduled) },
        FunnelStep { step: "Converted".to_string(), count: status_count(LeadStatus::Converted) },
    ];

    let by_source = frequency_table(by_source);
    let by_city = frequency_table(by_city);
    let by_service = frequency_table(by_service);

    let mut insights = Vec::new();
    if let Some(top) = by_source.iter().max_by_key(|e| e.value) {
        insights.push(format!(
            "Primary lead source is {} ({} leads).",
            top.name, top.value
        ));
    }
    let unassigned = leads
        .iter()
        .filter(|l| l.assigned_to.as_deref().map_or(true, |a| a.is_empty()))
        .count();
    if unassigned > 0 {
        insights.push(format!("{unassigned} leads are unassigned."));
    }
    let overdue = leads
        .iter()
        .filter(|l| l.next_followup_at.map_or(false, |t| t < now))
        .count();
    if overdue > 0 {
        insights.push(format!("{overdue} follow-ups are overdue."));
    }

    let converted = status_count(LeadStatus::Converted);
    let conversion_rate = if leads.is_empty() {
        0.0
    } else {
        converted as f64 / leads.len() as f64 * 100.0
    };

    AnalyticsData {
        volume_trend,
        by_source,
        by_city,
        by_service,
        funnel,
        insights,
        conversion_rate,
    }
}
