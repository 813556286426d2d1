//! Service layer: the running tracking core.

mod daily_reset;
mod error;
mod orchestrator;

pub use daily_reset::{next_reset_after, spawn_daily_reset};
pub use error::ServiceError;
pub use orchestrator::{TrackingService, TrackingServiceConfig};
