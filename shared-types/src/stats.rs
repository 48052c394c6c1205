use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Dashboard KPI strip. `total_leads` is the authoritative filtered count,
/// the remaining counters are computed over the page that was handed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeadStats {
    pub total_leads: i64,
    pub new_leads: i64,
    pub unassigned: i64,
    pub overdue: i64,
    /// Whole percentage, rounded.
    pub conversion_rate: i64,
}
