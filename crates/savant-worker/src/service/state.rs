//! Wired production services for the ingest worker.

use savant_nats::NatsClient;
use savant_nats::queue::QueueConfig;
use savant_opendal::StorageBackend;
use savant_postgres::PgClient;
use savant_rig::provider::EmbeddingProvider;
use tokio_util::sync::CancellationToken;

use crate::handler::{IngestPipeline, IngestWorker, NatsJobSource};
use crate::service::{TextSplitterService, WorkerConfig};
use crate::Result;

/// Application state for the ingest worker.
///
/// Holds the connected collaborators the pipeline needs. All clients are
/// cheaply cloneable; lifecycle is owned by the process entry point, which
/// constructs this state once and hands it to the worker.
#[derive(Clone)]
pub struct WorkerState {
    /// PostgreSQL database client.
    pub postgres: PgClient,
    /// NATS messaging client.
    pub nats: NatsClient,
    /// Object storage backend.
    pub storage: StorageBackend,
    /// Hosted embedding provider.
    pub embeddings: EmbeddingProvider,
}

impl WorkerState {
    /// Creates worker state from connected service instances.
    pub fn new(
        postgres: PgClient,
        nats: NatsClient,
        storage: StorageBackend,
        embeddings: EmbeddingProvider,
    ) -> Self {
        Self {
            postgres,
            nats,
            storage,
            embeddings,
        }
    }

    /// Builds the production ingest worker from this state.
    ///
    /// Binds the durable queue consumer, constructs the pipeline with the
    /// default splitter configuration, and returns a worker ready to spawn.
    pub async fn ingest_worker(
        &self,
        config: &WorkerConfig,
        cancel_token: CancellationToken,
    ) -> Result<IngestWorker<NatsJobSource, PgClient, StorageBackend, EmbeddingProvider>> {
        let queue_config =
            QueueConfig::default().with_visibility_timeout(config.visibility_timeout());
        let queue = self.nats.ingest_queue_with_config(queue_config).await?;
        let consumer = queue.consumer(&config.consumer_name).await?;

        let splitter = TextSplitterService::with_defaults()?;
        let pipeline = IngestPipeline::new(
            self.postgres.clone(),
            self.storage.clone(),
            self.embeddings.clone(),
            splitter,
        );

        Ok(IngestWorker::new(
            NatsJobSource::new(consumer),
            pipeline,
            config.clone(),
            cancel_token,
        ))
    }
}
