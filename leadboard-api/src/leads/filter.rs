use chrono::{DateTime, Utc};
use shared_types::{Lead, LeadFilterParams, LeadPriority};

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    /// Size of the filtered set, computed before pagination.
    pub total_count: i64,
}

fn in_set(set: &Option<Vec<String>>, value: Option<&str>) -> bool {
    match set {
        Some(values) if !values.is_empty() => {
            let value = value.unwrap_or("");
            values.iter().any(|v| v == value)
        }
        _ => true,
    }
}

fn unassigned(lead: &Lead) -> bool {
    lead.assigned_to.as_deref().map_or(true, |a| a.is_empty())
}

fn followup_overdue(lead: &Lead, now: DateTime<Utc>) -> bool {
    lead.next_followup_at.map_or(false, |t| t < now)
}

/// All active predicates must hold; an absent filter field is no constraint.
pub fn matches(lead: &Lead, filters: &LeadFilterParams, now: DateTime<Utc>) -> bool {
    // A present status set must contain the lead's status. The set can be
    // empty when every requested value was unrecognized; that matches nothing.
    if let Some(statuses) = &filters.status {
        if !statuses.contains(&lead.status) {
            return false;
        }
    }

    if let Some(search) = filters.search.as_deref() {
        let search = search.trim().to_lowercase();
        if !search.is_empty() {
            let field_matches = |field: Option<&str>| {
                field.map_or(false, |f| f.to_lowercase().contains(&search))
            };
            let hit = lead.name.to_lowercase().contains(&search)
                || field_matches(lead.email.as_deref())
                || field_matches(lead.phone.as_deref())
                || field_matches(lead.city.as_deref());
            if !hit {
                return false;
            }
        }
    }

    if !in_set(&filters.city, lead.city.as_deref())
        || !in_set(&filters.source, lead.source.as_deref())
        || !in_set(&filters.service_required, lead.service_required.as_deref())
        || !in_set(&filters.assigned_to, lead.assigned_to.as_deref())
    {
        return false;
    }

    if let Some(priorities) = &filters.priority {
        if !priorities.contains(&lead.priority) {
            return false;
        }
    }

    if let Some(from) = filters.date_from {
        if lead.created_at < from {
            return false;
        }
    }
    if let Some(to) = filters.date_to {
        if lead.created_at > to {
            return false;
        }
    }

    if filters.overdue && !followup_overdue(lead, now) {
        return false;
    }

    // Attention needed: follow-up in the past, or high priority sitting
    // unassigned. Derived on the fly, never stored.
    if filters.attention {
        let urgent_unassigned = lead.priority == LeadPriority::High && unassigned(lead);
        if !followup_overdue(lead, now) && !urgent_unassigned {
            return false;
        }
    }

    true
}

/// Filters the merged set, sorts by recency and slices one page. The sort is
/// stable, so leads with equal `created_at` keep their merge order. An
/// out-of-range page yields an empty page, not an error.
pub fn filter_sort_paginate(
    mut leads: Vec<Lead>,
    filters: &LeadFilterParams,
    page: usize,
    page_size: usize,
    now: DateTime<Utc>,
) -> LeadPage {
    leads.retain(|lead| matches(lead, filters, now));
    leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total_count = leads.len() as i64;
    let start = page.saturating_mul(page_size).min(leads.len());
    let end = start.saturating_add(page_size).min(leads.len());

    LeadPage {
        leads: leads[start..end].to_vec(),
        total_count,
    }
}
