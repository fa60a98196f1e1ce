#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for client-related operations.
///
/// Use this target for logging client initialization, configuration, and lifecycle events.
pub const TRACING_TARGET_CLIENT: &str = "savant_postgres::client";

/// Tracing target for database query operations.
///
/// Use this target for logging query execution, results, and query-related errors.
pub const TRACING_TARGET_QUERY: &str = "savant_postgres::query";

/// Tracing target for database connection operations.
///
/// Use this target for logging connection establishment, pool management, and connection errors.
pub const TRACING_TARGET_CONNECTION: &str = "savant_postgres::connection";

mod client;
mod error;
mod schema;

pub mod model;
pub mod query;
pub mod types;

#[doc(hidden)]
pub mod prelude;

pub use diesel_async::AsyncPgConnection as PgConnection;
pub use pgvector::Vector;

pub use crate::client::{ConnectionPool, PgClient, PgConfig, PgPoolStatus, PooledConnection};
pub use crate::error::{BoxError, PgError, PgResult};
