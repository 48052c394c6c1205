use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Pipeline stage of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    #[serde(rename = "Trial Scheduled")]
    TrialScheduled,
    Converted,
    Lost,
}

impl LeadStatus {
    /// Case-normalizes a raw value ("new" -> New); unrecognized values are
    /// rejected. Used where an unknown value must not silently match a real
    /// stage, as in filter descriptors.
    pub fn try_from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            "qualified" => Some(LeadStatus::Qualified),
            "trial scheduled" => Some(LeadStatus::TrialScheduled),
            "converted" => Some(LeadStatus::Converted),
            "lost" => Some(LeadStatus::Lost),
            _ => None,
        }
    }

    /// Case-normalizes a raw storage value ("new" -> New). Absent, empty or
    /// unrecognized values fall back to New.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(Self::try_from_raw).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::TrialScheduled => "Trial Scheduled",
            LeadStatus::Converted => "Converted",
            LeadStatus::Lost => "Lost",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LeadPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl LeadPriority {
    pub fn try_from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" => Some(LeadPriority::High),
            "medium" => Some(LeadPriority::Medium),
            "low" => Some(LeadPriority::Low),
            _ => None,
        }
    }

    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(Self::try_from_raw).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadPriority::High => "High",
            LeadPriority::Medium => "Medium",
            LeadPriority::Low => "Low",
        }
    }
}

/// Which backend collection a lead was read from. Immutable once read;
/// determines the table any mutation is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SourceTable {
    #[serde(rename = "leads")]
    Leads,
    #[serde(rename = "hire_helper_leads")]
    HireHelperLeads,
}

impl SourceTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            SourceTable::Leads => "leads",
            SourceTable::HireHelperLeads => "hire_helper_leads",
        }
    }
}

/// Canonical lead shape after normalization of either source table.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Lead {
    pub id: String,
    pub source_table: SourceTable,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub source: Option<String>,
    pub campaign: Option<String>,
    pub service_required: Option<String>,
    pub status: LeadStatus,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "specificRequirements")]
    pub specific_requirements: Option<String>,
    pub last_contacted_at: Option<DateTime<Utc>>,
    pub next_followup_at: Option<DateTime<Utc>>,
    pub priority: LeadPriority,
    pub score: Option<i64>,
}

/// Ephemeral query descriptor; lives only for one list request.
/// An absent field means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeadFilterParams {
    pub status: Option<Vec<LeadStatus>>,
    pub search: Option<String>,
    pub city: Option<Vec<String>>,
    pub source: Option<Vec<String>>,
    pub service_required: Option<Vec<String>>,
    pub assigned_to: Option<Vec<String>>,
    pub priority: Option<Vec<LeadPriority>>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub overdue: bool,
    #[serde(default)]
    pub attention: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct CreateLeadRequest {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub source: Option<String>,
    pub campaign: Option<String>,
    pub service_required: Option<String>,
    pub status: Option<LeadStatus>,
    pub priority: Option<LeadPriority>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub next_followup_at: Option<DateTime<Utc>>,
}

/// Partial update. Absent fields are left untouched; `source_table` selects
/// the backend table the write is routed to (defaults to `leads`).
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UpdateLeadRequest {
    pub source_table: Option<SourceTable>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub source: Option<String>,
    pub campaign: Option<String>,
    pub service_required: Option<String>,
    pub status: Option<LeadStatus>,
    pub priority: Option<LeadPriority>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub last_contacted_at: Option<DateTime<Utc>>,
    pub next_followup_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ListLeadsResponse {
    pub leads: Vec<Lead>,
    pub total_count: i64,
    pub page: usize,
    pub page_size: usize,
}

/// Distinct values for the filter dropdowns, derived from the merged set.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FilterOptionsResponse {
    pub cities: Vec<String>,
    pub sources: Vec<String>,
    pub services: Vec<String>,
}
