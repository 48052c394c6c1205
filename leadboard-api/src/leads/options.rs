use shared_types::{FilterOptionsResponse, Lead};
use std::collections::BTreeSet;

/// Distinct non-empty values for the filter dropdowns, sorted.
pub fn filter_options(leads: &[Lead]) -> FilterOptionsResponse {
    let mut cities = BTreeSet::new();
    let mut sources = BTreeSet::new();
    let mut services = BTreeSet::new();

    for lead in leads {
        if let Some(city) = lead.city.as_deref().filter(|c| !c.is_empty()) {
            cities.insert(city.to_string());
        }
        if let Some(source) = lead.source.as_deref().filter(|s| !s.is_empty()) {
            sources.insert(source.to_string());
        }
        if let Some(service) = lead.service_required.as_deref().filter(|s| !s.is_empty()) {
            services.insert(service.to_string());
        }
    }

    FilterOptionsResponse {
        cities: cities.into_iter().collect(),
        sources: sources.into_iter().collect(),
        services: services.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared_types::{LeadPriority, LeadStatus, SourceTable};

    fn lead(city: Option<&str>, source: Option<&str>, service: Option<&str>) -> Lead {
        Lead {
            id: "x".to_string(),
            source_table: SourceTable::Leads,
            created_at: Utc::now(),
            updated_at: None,
            name: "x".to_string(),
            phone: None,
            email: None,
            city: city.map(str::to_string),
            source: source.map(str::to_string),
            campaign: None,
            service_required: service.map(str::to_string),
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

    #[test]
    fn options_are_distinct_and_sorted() {
        let leads = vec![
            lead(Some("Pune"), Some("Website"), Some("Maid")),
            lead(Some("Bangalore"), Some("Website"), None),
            lead(Some("Pune"), Some(""), Some("Cook")),
            lead(None, Some("Referral"), Some("Cook")),
        ];
        let options = filter_options(&leads);
        assert_eq!(options.cities, vec!["Bangalore", "Pune"]);
        assert_eq!(options.sources, vec!["Referral", "Website"]);
        assert_eq!(options.services, vec!["Cook", "Maid"]);
    }
}
