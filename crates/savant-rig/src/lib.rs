#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for embedding provider operations.
pub const TRACING_TARGET_EMBEDDING: &str = "savant_rig::embedding";

/// Tracing target for retrieval operations.
pub const TRACING_TARGET_RAG: &str = "savant_rig::rag";

mod error;

pub mod provider;
pub mod rag;

pub use error::{Error, Result};
