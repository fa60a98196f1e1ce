//! Convenient re-exports for common use.

pub use crate::backend::{FileMetadata, StorageBackend};
pub use crate::config::{BackendType, StorageConfig};
pub use crate::error::{StorageError, StorageResult};
