//! Ingestion handlers.
//!
//! - [`IngestPipeline`] - the per-document state machine: download,
//!   extract, clean, chunk, embed, persist
//! - [`IngestWorker`] - the polling queue consumer wrapping the pipeline
//! - [`JobSource`] / [`JobLease`] - the lease-based queue contract, with
//!   the production NATS implementation

mod consumer;
mod pipeline;
mod source;

pub use consumer::{CircuitBreaker, IngestWorker};
pub use pipeline::{IngestPipeline, ProcessedDocument};
pub use source::{JobLease, JobSource, NatsJobLease, NatsJobSource};
