#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for client and connection operations.
pub const TRACING_TARGET_CLIENT: &str = "savant_nats::client";

/// Tracing target for queue operations.
pub const TRACING_TARGET_QUEUE: &str = "savant_nats::queue";

mod client;
mod error;

pub mod queue;

#[doc(hidden)]
pub mod prelude;

pub use client::{NatsClient, NatsConfig};
pub use error::{Error, Result};
