//! Worker services and state.
//!
//! - [`TextExtractor`] - media-type dispatched plain text extraction
//! - [`TextSplitterService`] - token-budget chunking with overlap
//! - [`DocumentStore`] / [`ObjectStorage`] - collaborator contracts with
//!   production implementations for the Postgres client and the storage
//!   backend
//! - [`WorkerState`] - wired production services

mod config;
mod extract;
mod splitter;
mod state;
mod storage;
mod store;

pub use config::WorkerConfig;
pub use extract::{MediaType, TextExtractor};
pub use splitter::{SplitterConfig, TextChunk, TextSplitterService};
pub use state::WorkerState;
pub use storage::ObjectStorage;
pub use store::{ChunkRecord, DocumentStore};
