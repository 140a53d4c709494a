pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod ingest;
pub mod layout;
pub mod models;
pub mod pdf;
pub mod report;
pub mod risk;
pub mod telemetry;
