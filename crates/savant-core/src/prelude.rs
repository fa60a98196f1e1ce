//! Convenient re-exports for common use.

pub use crate::emb::EmbeddingService;
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::health::{ServiceHealth, ServiceStatus};
pub use crate::provider::IntoProvider;
