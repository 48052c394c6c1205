pub mod analytics;
pub mod auth;
pub mod leads;
pub mod notifications;
