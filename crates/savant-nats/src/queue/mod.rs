//! Durable document ingest work queue.
//!
//! Built on a JetStream work-queue retention stream: every published job is
//! delivered to exactly one consumer at a time, hidden for the lease
//! duration (`ack_wait`), and removed only by an explicit acknowledgement.
//! An unacked job reappears after the lease lapses, which is the sole retry
//! mechanism; there is no application-level retry counter.

mod ingest_queue;
mod job;

pub use ingest_queue::{IngestConsumer, IngestQueue, LeasedJob, QueueConfig};
pub use job::IngestJob;
