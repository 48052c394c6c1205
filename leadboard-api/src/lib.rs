pub mod config;
pub mod database;
pub mod handlers;
pub mod helpers;
pub mod jobs;
pub mod leads;

pub use database::Database;
