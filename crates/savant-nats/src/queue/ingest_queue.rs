//! Work queue management for document ingest jobs.

use std::time::Duration;

use async_nats::jetstream::{self, stream};
use futures::StreamExt;
use tracing::{debug, error};

use super::job::IngestJob;
use crate::{Error, Result, TRACING_TARGET_QUEUE};

/// Default stream name for the ingest queue.
const DEFAULT_STREAM_NAME: &str = "DOCUMENT_INGEST";

/// Default subject jobs are published to.
const DEFAULT_SUBJECT: &str = "ingest.documents";

/// Default visibility timeout: how long a leased job stays hidden from other
/// consumers before it becomes redeliverable.
const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(300);

/// Settings for the ingest work queue.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// JetStream stream name.
    pub stream_name: String,
    /// Subject jobs are published to.
    pub subject: String,
    /// Lease duration for a dequeued job (JetStream `ack_wait`).
    pub visibility_timeout: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            stream_name: DEFAULT_STREAM_NAME.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            visibility_timeout: DEFAULT_VISIBILITY_TIMEOUT,
        }
    }
}

impl QueueConfig {
    /// Sets the visibility timeout.
    #[must_use]
    pub fn with_visibility_timeout(mut self, visibility_timeout: Duration) -> Self {
        self.visibility_timeout = visibility_timeout;
        self
    }
}

/// Durable work queue for document ingest jobs.
///
/// Uses work-queue retention: a message is removed from the stream only when
/// a consumer acknowledges it. At-least-once delivery; consumers must be safe
/// to re-run on an already-processed document.
pub struct IngestQueue {
    jetstream: jetstream::Context,
    config: QueueConfig,
}

impl IngestQueue {
    /// Creates (or binds to) the ingest work queue.
    #[tracing::instrument(skip(jetstream, config), target = TRACING_TARGET_QUEUE)]
    pub async fn new(jetstream: &jetstream::Context, config: QueueConfig) -> Result<Self> {
        let stream_config = stream::Config {
            name: config.stream_name.clone(),
            description: Some("Document ingest work queue".to_string()),
            subjects: vec![config.subject.clone()],
            retention: stream::RetentionPolicy::WorkQueue,
            ..Default::default()
        };

        // Bind to the existing stream if present, otherwise create it.
        match jetstream.get_stream(&config.stream_name).await {
            Ok(_) => {
                debug!(
                    target: TRACING_TARGET_QUEUE,
                    stream = %config.stream_name,
                    "Using existing ingest stream"
                );
            }
            Err(_) => {
                debug!(
                    target: TRACING_TARGET_QUEUE,
                    stream = %config.stream_name,
                    "Creating ingest stream"
                );
                jetstream
                    .create_stream(stream_config)
                    .await
                    .map_err(|e| Error::stream_error(&config.stream_name, e.to_string()))?;
            }
        }

        Ok(Self {
            jetstream: jetstream.clone(),
            config,
        })
    }

    /// Returns the queue configuration.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Publishes an ingest job onto the queue.
    #[tracing::instrument(skip(self, job), fields(document_id = %job.document_id), target = TRACING_TARGET_QUEUE)]
    pub async fn publish(&self, job: &IngestJob) -> Result<()> {
        let payload = serde_json::to_vec(job)?;

        self.jetstream
            .publish(self.config.subject.clone(), payload.into())
            .await
            .map_err(|e| Error::delivery_failed(&self.config.subject, e.to_string()))?
            .await
            .map_err(|e| Error::operation("job_publish", e.to_string()))?;

        debug!(
            target: TRACING_TARGET_QUEUE,
            document_id = %job.document_id,
            savant_id = %job.savant_id,
            subject = %self.config.subject,
            "Published ingest job"
        );
        Ok(())
    }

    /// Creates a durable pull consumer for this queue.
    ///
    /// The consumer's `ack_wait` is the queue's visibility timeout: a fetched
    /// job stays invisible to other consumers for this duration, then becomes
    /// redeliverable unless it was acknowledged.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_QUEUE)]
    pub async fn consumer(&self, consumer_name: &str) -> Result<IngestConsumer> {
        let consumer_config = jetstream::consumer::pull::Config {
            name: Some(consumer_name.to_string()),
            durable_name: Some(consumer_name.to_string()),
            description: Some("Document ingest consumer".to_string()),
            ack_wait: self.config.visibility_timeout,
            ..Default::default()
        };

        let stream = self
            .jetstream
            .get_stream(&self.config.stream_name)
            .await
            .map_err(|e| Error::stream_error(&self.config.stream_name, e.to_string()))?;

        let consumer = stream
            .create_consumer(consumer_config)
            .await
            .map_err(|e| Error::consumer_error(consumer_name, e.to_string()))?;

        debug!(
            target: TRACING_TARGET_QUEUE,
            consumer = %consumer_name,
            visibility_timeout_secs = self.config.visibility_timeout.as_secs(),
            "Created ingest consumer"
        );

        Ok(IngestConsumer { consumer })
    }
}

/// Pull consumer over the ingest queue.
pub struct IngestConsumer {
    consumer: jetstream::consumer::PullConsumer,
}

impl IngestConsumer {
    /// Fetches at most one job from the queue.
    ///
    /// Returns `Ok(None)` when the queue has no deliverable job. A payload
    /// that fails to deserialize is acknowledged (discarded) so a poison
    /// message cannot wedge the queue.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_QUEUE)]
    pub async fn fetch_next(&self) -> Result<Option<LeasedJob>> {
        let mut messages = self
            .consumer
            .fetch()
            .max_messages(1)
            .messages()
            .await
            .map_err(|e| Error::operation("job_fetch", e.to_string()))?;

        let Some(Ok(message)) = messages.next().await else {
            return Ok(None);
        };

        let job: IngestJob = match serde_json::from_slice(&message.payload) {
            Ok(job) => job,
            Err(e) => {
                error!(
                    target: TRACING_TARGET_QUEUE,
                    error = %e,
                    "Discarding undeserializable ingest job"
                );
                message.ack().await.ok();
                return Ok(None);
            }
        };

        Ok(Some(LeasedJob { job, message }))
    }
}

/// An ingest job leased from the queue.
///
/// The job stays hidden from other consumers until the visibility timeout
/// elapses. Call [`LeasedJob::ack`] after successful processing to delete it;
/// dropping the lease leaves the job to reappear for automatic retry.
pub struct LeasedJob {
    job: IngestJob,
    message: jetstream::Message,
}

impl LeasedJob {
    /// Returns the job payload.
    pub fn job(&self) -> &IngestJob {
        &self.job
    }

    /// Acknowledges the job, permanently removing it from the queue.
    ///
    /// This is the only way a job is deleted. If the ack fails after
    /// processing succeeded, the job will be redelivered and reprocessed,
    /// which the ingest pipeline tolerates by replacing chunk sets.
    pub async fn ack(self) -> Result<()> {
        self.message
            .ack()
            .await
            .map_err(|e| Error::ack(e.to_string()))
    }

    /// Consumes the lease, returning the job payload.
    pub fn into_job(self) -> IngestJob {
        self.job
    }
}
