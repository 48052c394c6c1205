use chrono::{DateTime, Utc};
use shared_types::{Lead, LeadPriority, LeadStatus, SourceTable};

use crate::database::leads::{HireHelperRow, LeadsRow, RawLeadRow};

fn parse_ts(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// created_at is required at insert; an unparseable value degrades to the
// epoch instead of failing the row.
fn parse_created_at(raw: Option<&str>) -> DateTime<Utc> {
    parse_ts(raw).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Maps a raw row into the canonical lead shape. No error conditions:
/// malformed or missing optional fields degrade to defaults.
pub fn normalize(row: RawLeadRow) -> Lead {
    match row {
        RawLeadRow::Leads(row) => normalize_leads_row(row),
        RawLeadRow::HireHelper(row) => normalize_hire_row(row),
    }
}

fn normalize_leads_row(row: LeadsRow) -> Lead {
    Lead {
        id: row.id,
        source_table: SourceTable::Leads,
        created_at: parse_created_at(row.created_at.as_deref()),
        updated_at: parse_ts(row.updated_at.as_deref()),
        name: row.name.unwrap_or_default(),
        phone: row.phone,
        email: row.email,
        city: row.city,
        source: row.source,
        campaign: row.campaign,
        service_required: row.service,
        status: LeadStatus::from_raw(row.status.as_deref()),
        assigned_to: row.assigned_to,
        notes: row.notes,
        message: None,
        specific_requirements: None,
        last_contacted_at: parse_ts(row.last_contacted_at.as_deref()),
        next_followup_at: parse_ts(row.next_followup_at.as_deref()),
        priority: LeadPriority::from_raw(row.priority.as_deref()),
        score: row.score,
    }
}

fn normalize_hire_row(row: HireHelperRow) -> Lead {
    Lead {
        id: row.id.to_string(),
        source_table: SourceTable::HireHelperLeads,
        created_at: parse_created_at(row.created_at.as_deref()),
        updated_at: None,
        name: row.name.unwrap_or_default(),
        phone: row.phone,
        email: row.email,
        city: row.city,
        source: row.source,
        campaign: None,
        service_required: row.service,
        status: LeadStatus::from_raw(row.status.as_deref()),
        assigned_to: row.assigned_to,
        notes: row.notes,
        message: row.message,
        specific_requirements: row.specific_requirements,
        last_contacted_at: parse_ts(row.last_contacted_at.as_deref()),
        next_followup_at: parse_ts(row.next_followup_at.as_deref()),
        priority: LeadPriority::from_raw(row.priority.as_deref()),
        score: row.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_title_cased() {
        let row = LeadsRow {
            id: "a".to_string(),
            status: Some("new".to_string()),
            ..Default::default()
        };
        let lead = normalize(RawLeadRow::Leads(row));
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.status.as_str(), "New");

        let row = LeadsRow {
            id: "b".to_string(),
            status: Some("TRIAL SCHEDULED".to_string()),
            ..Default::default()
        };
        let lead = normalize(RawLeadRow::Leads(row));
        assert_eq!(lead.status, LeadStatus::TrialScheduled);
        assert_eq!(lead.status.as_str(), "Trial Scheduled");
    }

    #[test]
    fn missing_status_defaults_to_new() {
        let lead = normalize(RawLeadRow::Leads(LeadsRow {
            id: "a".to_string(),
            ..Default::default()
        }));
        assert_eq!(lead.status, LeadStatus::New);

        let lead = normalize(RawLeadRow::Leads(LeadsRow {
            id: "a".to_string(),
            status: Some("".to_string()),
            ..Default::default()
        }));
        assert_eq!(lead.status, LeadStatus::New);
    }

    #[test]
    fn missing_priority_defaults_to_medium() {
        let lead = normalize(RawLeadRow::HireHelper(HireHelperRow {
            id: 7,
            ..Default::default()
        }));
        assert_eq!(lead.priority, LeadPriority::Medium);
    }

    #[test]
    fn hire_row_id_is_stringified_and_tagged() {
        let lead = normalize(RawLeadRow::HireHelper(HireHelperRow {
            id: 42,
            service: Some("Nanny".to_string()),
            ..Default::default()
        }));
        assert_eq!(lead.id, "42");
        assert_eq!(lead.source_table, SourceTable::HireHelperLeads);
        // Raw `service` column lands on `service_required`.
        assert_eq!(lead.service_required.as_deref(), Some("Nanny"));
    }

    #[test]
    fn bad_created_at_degrades_to_epoch() {
        let lead = normalize(RawLeadRow::Leads(LeadsRow {
            id: "a".to_string(),
            created_at: Some("not a timestamp".to_string()),
            ..Default::default()
        }));
        assert_eq!(lead.created_at, DateTime::<Utc>::UNIX_EPOCH);
    }
}
