#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for embedding operations.
pub const TRACING_TARGET_EMB: &str = "savant_core::emb";

mod error;
mod health;
mod provider;

pub mod emb;

#[doc(hidden)]
pub mod prelude;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
pub use provider::IntoProvider;
