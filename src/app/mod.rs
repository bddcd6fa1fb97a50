// Application layer: use cases and the ports they depend on

pub mod ports;
pub mod sync_use_case;

pub use sync_use_case::{SyncOutcome, SyncSubscriptionsUseCase};
