//! Convenient re-exports for common use.

pub use crate::client::{NatsClient, NatsConfig};
pub use crate::queue::{IngestConsumer, IngestJob, IngestQueue, LeasedJob, QueueConfig};
pub use crate::{Error, Result};
