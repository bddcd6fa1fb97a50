pub mod common;
pub mod config;
pub mod domain;
pub mod observability;
pub mod pipeline;

// Use cases and the adapters behind their ports
pub mod app;
pub mod infra;

pub use common::error::{Result, SyncError};
pub use domain::{RawRow, SubscriptionRecord, SubscriptionStatus};
pub use pipeline::{synchronize, StatusTally, SyncPipeline};
