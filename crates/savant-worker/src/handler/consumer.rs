//! Polling queue consumer for ingest jobs.

use std::time::Duration;

use savant_core::emb::EmbeddingService;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::pipeline::IngestPipeline;
use super::source::{JobLease, JobSource};
use crate::service::{DocumentStore, ObjectStorage, WorkerConfig};
use crate::Result;

/// Tracing target for the ingest worker loop.
const TRACING_TARGET: &str = "savant_worker::consumer";

/// Backoff after a queue transport error, before the breaker trips.
const TRANSPORT_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Idle polls between heartbeat log lines (30 polls at 2 s each ≈ 60 s).
const IDLE_HEARTBEAT_POLLS: u64 = 30;

/// Consecutive-failure circuit breaker.
///
/// Counts processing failures across poll cycles; any success resets the
/// count. When the count reaches the threshold the breaker trips, which
/// both signals the caller to pause and resets the count so the next
/// failure series starts from zero.
#[derive(Debug)]
pub struct CircuitBreaker {
    threshold: u32,
    consecutive_failures: u32,
}

impl CircuitBreaker {
    /// Creates a breaker that trips after `threshold` consecutive failures.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            consecutive_failures: 0,
        }
    }

    /// Records a success, resetting the failure count.
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Records a failure. Returns `true` when the breaker trips.
    pub fn record_failure(&mut self) -> bool {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= self.threshold {
            self.consecutive_failures = 0;
            return true;
        }
        false
    }

    /// Returns the current consecutive failure count.
    pub fn failures(&self) -> u32 {
        self.consecutive_failures
    }
}

/// Background worker consuming the document ingest queue.
///
/// An infinite polling loop with these guarantees:
///
/// - At most one job per poll cycle; each document is processed
///   start-to-finish before the next poll.
/// - A job is deleted from the queue only after successful processing; a
///   failed job is simply dropped and reappears after the visibility
///   timeout, which is the only retry mechanism.
/// - Repeated consecutive failures trip a circuit breaker that pauses
///   polling for a cooldown period, so a persistently failing dependency
///   cannot burn quota in a tight loop.
/// - Cancellation is cooperative and only observed at poll-iteration
///   boundaries, never mid-document.
pub struct IngestWorker<Q, D, S, E> {
    source: Q,
    pipeline: IngestPipeline<D, S, E>,
    config: WorkerConfig,
    cancel_token: CancellationToken,
}

impl<Q, D, S, E> IngestWorker<Q, D, S, E>
where
    Q: JobSource + Send + 'static,
    D: DocumentStore + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
    E: EmbeddingService + Send + Sync + 'static,
{
    /// Creates a new ingest worker.
    pub fn new(
        source: Q,
        pipeline: IngestPipeline<D, S, E>,
        config: WorkerConfig,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            source,
            pipeline,
            config,
            cancel_token,
        }
    }

    /// Spawns the worker as a background task.
    ///
    /// Returns a join handle that can be used to await worker completion
    /// after cancelling it on shutdown.
    pub fn spawn(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }

    /// Runs the worker loop until cancelled.
    #[tracing::instrument(
        skip(self),
        fields(consumer = %self.config.consumer_name),
        target = TRACING_TARGET,
        name = "ingest_worker"
    )]
    pub async fn run(mut self) -> Result<()> {
        tracing::info!(
            target: TRACING_TARGET,
            poll_interval_secs = self.config.poll_interval_secs,
            max_consecutive_failures = self.config.max_consecutive_failures,
            "Starting ingest worker"
        );

        let mut breaker = CircuitBreaker::new(self.config.max_consecutive_failures);
        let mut idle_polls: u64 = 0;

        loop {
            let polled = tokio::select! {
                biased;

                () = self.cancel_token.cancelled() => {
                    tracing::info!(
                        target: TRACING_TARGET,
                        "Shutdown requested, stopping ingest worker"
                    );
                    break;
                }

                polled = self.source.poll() => polled,
            };

            match polled {
                Ok(Some((job, lease))) => {
                    idle_polls = 0;

                    match self.pipeline.process(&job).await {
                        Ok(outcome) => {
                            // Delete the job; this is the only path that
                            // permanently removes it from the queue.
                            if let Err(error) = lease.complete().await {
                                tracing::error!(
                                    target: TRACING_TARGET,
                                    document_id = %outcome.document_id,
                                    error = %error,
                                    "Processed job could not be deleted; it will be redelivered"
                                );
                            }
                            breaker.record_success();
                        }
                        Err(error) => {
                            tracing::error!(
                                target: TRACING_TARGET,
                                document_id = %job.document_id,
                                error = %error,
                                "Job processing failed, leaving it for redelivery"
                            );

                            // Not deleted: the job reappears after the
                            // visibility timeout elapses.
                            drop(lease);

                            if breaker.record_failure() {
                                self.cooldown().await;
                            }
                        }
                    }
                }

                Ok(None) => {
                    idle_polls += 1;
                    if idle_polls % IDLE_HEARTBEAT_POLLS == 0 {
                        tracing::debug!(
                            target: TRACING_TARGET,
                            idle_polls,
                            "Waiting for jobs"
                        );
                    }
                    self.sleep(self.config.poll_interval()).await;
                }

                Err(error) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        error = %error,
                        "Queue poll failed"
                    );

                    if breaker.record_failure() {
                        self.cooldown().await;
                    } else {
                        self.sleep(TRANSPORT_ERROR_BACKOFF).await;
                    }
                }
            }
        }

        Ok(())
    }

    /// Pauses polling after the breaker trips.
    async fn cooldown(&self) {
        tracing::warn!(
            target: TRACING_TARGET,
            threshold = self.config.max_consecutive_failures,
            cooldown_secs = self.config.cooldown_secs,
            "Too many consecutive failures, pausing polling"
        );
        self.sleep(self.config.cooldown()).await;
    }

    /// Sleeps, waking early on cancellation.
    async fn sleep(&self, duration: Duration) {
        tokio::select! {
            biased;
            () = self.cancel_token.cancelled() => {}
            () = tokio::time::sleep(duration) => {}
        }
    }
}
