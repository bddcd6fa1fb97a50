pub mod ingestion;
pub mod orchestrator;
pub mod processing;

pub use orchestrator::{synchronize, StatusTally, SyncPipeline};
