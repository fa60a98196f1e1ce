//! End-to-end ingestion scenarios against in-memory collaborators.

mod support;

use std::time::Duration;

use savant_nats::queue::IngestJob;
use savant_opendal::{StorageBackend, StorageConfig};
use savant_postgres::types::DocumentStatus;
use savant_test::MockEmbeddingService;
use savant_worker::{
    IngestPipeline, IngestWorker, TextSplitterService, WorkerConfig, WorkerError,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::support::{MemoryDocumentStore, MemoryJobQueue};

const STORAGE_PATH: &str = "accounts/acme/documents/handbook.txt";

fn job(mime_type: &str) -> IngestJob {
    IngestJob::new(
        Uuid::now_v7(),
        Uuid::now_v7(),
        Uuid::now_v7(),
        STORAGE_PATH,
        mime_type,
    )
}

async fn storage_with(content: &[u8]) -> StorageBackend {
    let storage = StorageBackend::new(StorageConfig::memory())
        .await
        .expect("memory storage");
    storage.write(STORAGE_PATH, content).await.unwrap();
    storage
}

fn pipeline(
    store: MemoryDocumentStore,
    storage: StorageBackend,
    embeddings: MockEmbeddingService,
) -> IngestPipeline<MemoryDocumentStore, StorageBackend, MockEmbeddingService> {
    IngestPipeline::new(
        store,
        storage,
        embeddings,
        TextSplitterService::with_defaults().expect("splitter"),
    )
}

/// Plain text measuring at least `min_tokens` per the shared tokenizer.
fn text_of_at_least(min_tokens: usize) -> String {
    let splitter = TextSplitterService::with_defaults().expect("splitter");
    let mut text = String::new();
    let mut i = 0;
    while splitter.token_count(&text) < min_tokens {
        text.push_str(&format!(
            "Paragraph {i} of the employee handbook covers travel expenses for region {}. ",
            i % 11
        ));
        i += 1;
    }
    text
}

#[tokio::test]
async fn plain_text_document_completes_with_multiple_chunks() {
    let store = MemoryDocumentStore::default();
    let storage = storage_with(text_of_at_least(2000).as_bytes()).await;
    let embeddings = MockEmbeddingService::with_dimensions(32);

    let pipeline = pipeline(store.clone(), storage, embeddings.clone());
    let job = job("text/plain");

    let outcome = pipeline.process(&job).await.unwrap();

    assert!(outcome.chunk_count >= 2, "expected at least two chunks");
    assert_eq!(
        store.transitions(job.document_id),
        vec![DocumentStatus::Processing, DocumentStatus::Completed]
    );
    assert_eq!(store.chunk_count(job.document_id), outcome.chunk_count);
    assert!(store.error(job.document_id).is_none());

    let chunks = store.chunks(job.document_id);
    assert_eq!(chunks.len(), outcome.chunk_count);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_index, i as i32, "chunk indices must be gapless");
        assert_eq!(chunk.embedding.len(), 32);
        assert!(chunk.token_count > 0 && chunk.token_count <= 800);
    }

    // All chunks were embedded in a single batch call.
    assert_eq!(embeddings.batch_calls(), 1);
}

#[tokio::test]
async fn reprocessing_replaces_chunks_without_duplicates() {
    let store = MemoryDocumentStore::default();
    let storage = storage_with(text_of_at_least(1200).as_bytes()).await;
    let embeddings = MockEmbeddingService::with_dimensions(16);

    let pipeline = pipeline(store.clone(), storage, embeddings);
    let job = job("text/plain");

    let first = pipeline.process(&job).await.unwrap();
    let second = pipeline.process(&job).await.unwrap();

    assert_eq!(first.chunk_count, second.chunk_count);
    assert_eq!(store.chunks(job.document_id).len(), second.chunk_count);
}

#[tokio::test]
async fn unsupported_media_type_fails_document() {
    let store = MemoryDocumentStore::default();
    let storage = storage_with(b"binary image bytes here").await;
    let embeddings = MockEmbeddingService::with_dimensions(16);

    let pipeline = pipeline(store.clone(), storage, embeddings);
    let job = job("image/png");

    let err = pipeline.process(&job).await.unwrap_err();
    assert!(matches!(err, WorkerError::UnsupportedMediaType(_)));

    assert_eq!(store.status(job.document_id), Some(DocumentStatus::Failed));
    assert!(
        store
            .error(job.document_id)
            .unwrap()
            .contains("unsupported file type")
    );
    assert!(store.chunks(job.document_id).is_empty());
}

#[tokio::test]
async fn missing_storage_object_records_download_failure() {
    let store = MemoryDocumentStore::default();
    let storage = StorageBackend::new(StorageConfig::memory()).await.unwrap();
    let embeddings = MockEmbeddingService::with_dimensions(16);

    let pipeline = pipeline(store.clone(), storage, embeddings);
    let job = job("text/plain");

    let err = pipeline.process(&job).await.unwrap_err();
    assert!(matches!(err, WorkerError::StorageDownload(_)));

    assert_eq!(store.status(job.document_id), Some(DocumentStatus::Failed));
    assert!(
        store
            .error(job.document_id)
            .unwrap()
            .contains("download failure")
    );
}

#[tokio::test]
async fn below_minimum_text_never_completes() {
    let store = MemoryDocumentStore::default();
    let storage = storage_with(b"tiny").await;
    let embeddings = MockEmbeddingService::with_dimensions(16);

    let pipeline = pipeline(store.clone(), storage, embeddings);
    let job = job("text/plain");

    let err = pipeline.process(&job).await.unwrap_err();
    assert!(matches!(err, WorkerError::EmptyExtraction));

    let transitions = store.transitions(job.document_id);
    assert_eq!(
        transitions,
        vec![DocumentStatus::Processing, DocumentStatus::Failed]
    );
    assert!(!transitions.contains(&DocumentStatus::Completed));
}

#[tokio::test]
async fn embedding_failure_does_not_write_partial_chunks() {
    let store = MemoryDocumentStore::default();
    let storage = storage_with(text_of_at_least(1000).as_bytes()).await;
    let embeddings = MockEmbeddingService::with_dimensions(16);
    embeddings.fail_with("rate limited");

    let pipeline = pipeline(store.clone(), storage, embeddings);
    let job = job("text/plain");

    let err = pipeline.process(&job).await.unwrap_err();
    assert!(matches!(err, WorkerError::Embedding(_)));

    assert_eq!(store.status(job.document_id), Some(DocumentStatus::Failed));
    assert!(store.error(job.document_id).unwrap().contains("rate limited"));
    assert!(store.chunks(job.document_id).is_empty());
}

#[tokio::test(start_paused = true)]
async fn worker_deletes_job_only_on_success() {
    let store = MemoryDocumentStore::default();
    let storage = storage_with(text_of_at_least(1000).as_bytes()).await;
    let embeddings = MockEmbeddingService::with_dimensions(16);

    let queue = MemoryJobQueue::new(Duration::from_secs(300));
    let job = job("text/plain");
    queue.push(job.clone());

    let cancel = CancellationToken::new();
    let worker = IngestWorker::new(
        queue.clone(),
        pipeline(store.clone(), storage, embeddings),
        WorkerConfig::default(),
        cancel.clone(),
    );
    let handle = worker.spawn();

    tokio::time::timeout(Duration::from_secs(600), async {
        while !queue.is_empty() {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    })
    .await
    .expect("job should be deleted after success");

    cancel.cancel();
    handle.await.unwrap().unwrap();

    assert_eq!(
        store.status(job.document_id),
        Some(DocumentStatus::Completed)
    );
    assert_eq!(queue.deliveries_of(job.document_id).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_job_is_redelivered_after_visibility_timeout() {
    let visibility_timeout = Duration::from_secs(300);

    let store = MemoryDocumentStore::default();
    let storage = storage_with(text_of_at_least(1000).as_bytes()).await;
    let embeddings = MockEmbeddingService::with_dimensions(16);
    embeddings.fail_with("embedding provider down");

    let queue = MemoryJobQueue::new(visibility_timeout);
    let job = job("text/plain");
    queue.push(job.clone());

    let cancel = CancellationToken::new();
    let worker = IngestWorker::new(
        queue.clone(),
        pipeline(store.clone(), storage, embeddings),
        WorkerConfig::default(),
        cancel.clone(),
    );
    let handle = worker.spawn();

    tokio::time::timeout(Duration::from_secs(3600), async {
        while queue.deliveries_of(job.document_id).len() < 2 {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    })
    .await
    .expect("job should be redelivered");

    cancel.cancel();
    handle.await.unwrap().unwrap();

    // The job was never deleted, the document is failed, and the second
    // delivery happened only after the visibility timeout elapsed.
    assert_eq!(queue.len(), 1);
    assert_eq!(store.status(job.document_id), Some(DocumentStatus::Failed));
    assert!(
        store
            .error(job.document_id)
            .unwrap()
            .contains("embedding provider down")
    );

    let deliveries = queue.deliveries_of(job.document_id);
    assert!(deliveries[1] - deliveries[0] >= visibility_timeout);
}

#[tokio::test(start_paused = true)]
async fn repeated_failures_trip_cooldown_and_success_recovers() {
    // Short visibility timeout so every poll cycle redelivers the job.
    let queue = MemoryJobQueue::new(Duration::from_secs(1));

    let store = MemoryDocumentStore::default();
    let storage = storage_with(text_of_at_least(1000).as_bytes()).await;
    let embeddings = MockEmbeddingService::with_dimensions(16);
    embeddings.fail_with("provider outage");

    let job = job("text/plain");
    queue.push(job.clone());

    let config = WorkerConfig::default(); // threshold 5, cooldown 60 s
    let cancel = CancellationToken::new();
    let worker = IngestWorker::new(
        queue.clone(),
        pipeline(store.clone(), storage, embeddings.clone()),
        config,
        cancel.clone(),
    );
    let handle = worker.spawn();

    // Wait for the sixth delivery: five failures trip the breaker, so the
    // sixth attempt only happens after the cooldown.
    tokio::time::timeout(Duration::from_secs(3600), async {
        while queue.deliveries_of(job.document_id).len() < 6 {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    })
    .await
    .expect("worker should keep retrying");

    let deliveries = queue.deliveries_of(job.document_id);
    let cooldown = Duration::from_secs(60);

    // Before the breaker trips, retries are paced by the poll cycle alone.
    for pair in deliveries.windows(2).take(4) {
        assert!(pair[1] - pair[0] < cooldown, "unexpected pause before trip");
    }
    // The fifth failure pauses polling for the full cooldown.
    assert!(
        deliveries[5] - deliveries[4] >= cooldown,
        "breaker did not pause polling"
    );

    // Once the provider recovers, the next delivery succeeds and the job
    // is deleted.
    embeddings.recover();
    tokio::time::timeout(Duration::from_secs(3600), async {
        while !queue.is_empty() {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    })
    .await
    .expect("job should complete after recovery");

    cancel.cancel();
    handle.await.unwrap().unwrap();

    assert_eq!(
        store.status(job.document_id),
        Some(DocumentStatus::Completed)
    );
}
