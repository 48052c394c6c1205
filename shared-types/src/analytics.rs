use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrendPoint {
    /// Calendar day as "YYYY-MM-DD".
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FrequencyEntry {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FunnelStep {
    pub step: String,
    pub count: i64,
}

/// Chart-ready aggregates over a window of leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalyticsData {
    pub volume_trend: Vec<TrendPoint>,
    pub by_source: Vec<FrequencyEntry>,
    pub by_city: Vec<FrequencyEntry>,
    pub by_service: Vec<FrequencyEntry>,
    pub funnel: Vec<FunnelStep>,
    pub insights: Vec<String>,
    pub conversion_rate: f64,
}
