pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;

// Ports the pipeline depends on, and their concrete adapters
pub mod app;
pub mod infra;
