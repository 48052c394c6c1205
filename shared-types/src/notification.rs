use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Transient "new lead arrived" notice raised by the realtime bridge on
/// insert events. Kept in a bounded in-memory ring, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeadNotification {
    pub lead_id: String,
    pub name: String,
    pub source: Option<String>,
    pub service_required: Option<String>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NotificationsResponse {
    pub notifications: Vec<LeadNotification>,
}
