pub mod analytics;
pub mod lead;
pub mod notification;
pub mod stats;
pub mod user;

pub use analytics::{AnalyticsData, FrequencyEntry, FunnelStep, TrendPoint};
pub use lead::{
    CreateLeadRequest, FilterOptionsResponse, Lead, LeadFilterParams, LeadPriority, LeadStatus,
    ListLeadsResponse, SourceTable, UpdateLeadRequest,
};
pub use notification::{LeadNotification, NotificationsResponse};
pub use stats::LeadStats;
pub use user::{CreateUserRequest, CreateUserResponse};
