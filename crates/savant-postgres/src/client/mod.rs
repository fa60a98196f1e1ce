//! Database client and connection configuration.

mod pg_client;
mod pg_config;

pub use pg_client::{ConnectionPool, PgClient, PgPoolStatus, PooledConnection};
pub use pg_config::PgConfig;
