pub mod app;
pub mod config;
pub mod constants;
pub mod enrich;
pub mod error;
pub mod export;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod roster;
pub mod types;
