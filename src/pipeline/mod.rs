// Sync pipeline: ingestion, row processing, snapshot storage and rendering

pub mod ingestion;
pub mod orchestrator;
pub mod processing;
pub mod render;
pub mod storage;

pub use orchestrator::{render_outputs, RenderCounts, SyncPipeline};
