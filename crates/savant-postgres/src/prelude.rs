//! Prelude module for savant-postgres.
//!
//! Re-exports the most commonly used types and traits so downstream crates
//! can import everything they need with a single `use` statement.

// Common query traits
pub use diesel::prelude::*;
pub use diesel_async::RunQueryDsl;

pub use crate::client::{ConnectionPool, PgClient, PgConfig, PgPoolStatus, PooledConnection};
pub use crate::model::{
    Document, DocumentChunk, NewDocument, NewDocumentChunk, ScoredDocumentChunk, UpdateDocument,
};
pub use crate::query::{DocumentChunkRepository, DocumentRepository};
pub use crate::types::DocumentStatus;
// Connection type
pub use crate::PgConnection;
// Error types
pub use crate::{PgError, PgResult};
