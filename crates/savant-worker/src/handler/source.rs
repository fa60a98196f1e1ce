//! Lease-based queue contract for the ingest worker.

use async_trait::async_trait;
use savant_nats::queue::{IngestConsumer, IngestJob, LeasedJob};

use crate::Result;

/// A held lease on a dequeued job.
///
/// Completing the lease permanently deletes the job from the queue.
/// Dropping it without completing leaves the job hidden until the
/// visibility timeout elapses, after which it is redelivered. This is the
/// sole retry mechanism; there is no explicit failure state at the queue
/// level.
#[async_trait]
pub trait JobLease: Send {
    /// Deletes the job from the queue after successful processing.
    async fn complete(self) -> Result<()>;
}

/// Source of ingest jobs for the worker loop.
#[async_trait]
pub trait JobSource: Send {
    /// The lease type handed out with each job.
    type Lease: JobLease;

    /// Polls for at most one job.
    ///
    /// Returns `Ok(None)` when no job is currently deliverable.
    async fn poll(&mut self) -> Result<Option<(IngestJob, Self::Lease)>>;
}

/// Production job source backed by a NATS pull consumer.
pub struct NatsJobSource {
    consumer: IngestConsumer,
}

impl NatsJobSource {
    /// Creates a job source over the given consumer.
    pub fn new(consumer: IngestConsumer) -> Self {
        Self { consumer }
    }
}

/// Lease over a NATS-delivered job.
pub struct NatsJobLease {
    leased: LeasedJob,
}

#[async_trait]
impl JobLease for NatsJobLease {
    async fn complete(self) -> Result<()> {
        Ok(self.leased.ack().await?)
    }
}

#[async_trait]
impl JobSource for NatsJobSource {
    type Lease = NatsJobLease;

    async fn poll(&mut self) -> Result<Option<(IngestJob, Self::Lease)>> {
        match self.consumer.fetch_next().await? {
            Some(leased) => {
                let job = leased.job().clone();
                Ok(Some((job, NatsJobLease { leased })))
            }
            None => Ok(None),
        }
    }
}
