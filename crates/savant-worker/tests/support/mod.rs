//! In-memory collaborators for ingestion tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use savant_nats::queue::IngestJob;
use savant_postgres::types::DocumentStatus;
use savant_worker::{ChunkRecord, DocumentStore, JobLease, JobSource, Result};
use tokio::time::Instant;
use uuid::Uuid;

/// In-memory document store recording status transitions and chunk sets.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    documents: HashMap<Uuid, DocumentState>,
    chunks: HashMap<Uuid, Vec<ChunkRecord>>,
}

#[derive(Default)]
struct DocumentState {
    status: Option<DocumentStatus>,
    transitions: Vec<DocumentStatus>,
    error: Option<String>,
    chunk_count: usize,
}

impl MemoryDocumentStore {
    pub fn status(&self, document_id: Uuid) -> Option<DocumentStatus> {
        self.inner
            .lock()
            .unwrap()
            .documents
            .get(&document_id)
            .and_then(|d| d.status)
    }

    pub fn transitions(&self, document_id: Uuid) -> Vec<DocumentStatus> {
        self.inner
            .lock()
            .unwrap()
            .documents
            .get(&document_id)
            .map(|d| d.transitions.clone())
            .unwrap_or_default()
    }

    pub fn error(&self, document_id: Uuid) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .documents
            .get(&document_id)
            .and_then(|d| d.error.clone())
    }

    pub fn chunk_count(&self, document_id: Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .documents
            .get(&document_id)
            .map(|d| d.chunk_count)
            .unwrap_or_default()
    }

    pub fn chunks(&self, document_id: Uuid) -> Vec<ChunkRecord> {
        self.inner
            .lock()
            .unwrap()
            .chunks
            .get(&document_id)
            .cloned()
            .unwrap_or_default()
    }

    fn transition(&self, document_id: Uuid, status: DocumentStatus) {
        let mut inner = self.inner.lock().unwrap();
        let state = inner.documents.entry(document_id).or_default();
        state.status = Some(status);
        state.transitions.push(status);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn mark_processing(&self, document_id: Uuid) -> Result<()> {
        self.transition(document_id, DocumentStatus::Processing);
        Ok(())
    }

    async fn mark_completed(&self, document_id: Uuid, chunk_count: usize) -> Result<()> {
        self.transition(document_id, DocumentStatus::Completed);
        let mut inner = self.inner.lock().unwrap();
        let state = inner.documents.entry(document_id).or_default();
        state.chunk_count = chunk_count;
        state.error = None;
        Ok(())
    }

    async fn mark_failed(&self, document_id: Uuid, error: &str) -> Result<()> {
        self.transition(document_id, DocumentStatus::Failed);
        let mut inner = self.inner.lock().unwrap();
        let state = inner.documents.entry(document_id).or_default();
        state.error = Some(error.to_string());
        Ok(())
    }

    async fn replace_chunks(&self, job: &IngestJob, chunks: Vec<ChunkRecord>) -> Result<usize> {
        let count = chunks.len();
        self.inner
            .lock()
            .unwrap()
            .chunks
            .insert(job.document_id, chunks);
        Ok(count)
    }
}

/// In-memory work queue with lease-based visibility timeouts.
///
/// Mirrors the at-least-once queue contract: a polled job stays invisible
/// for the visibility timeout, completing the lease removes it, dropping
/// the lease leaves it to reappear once the timeout elapses.
#[derive(Clone)]
pub struct MemoryJobQueue {
    inner: Arc<Mutex<QueueInner>>,
    visibility_timeout: Duration,
}

#[derive(Default)]
struct QueueInner {
    next_id: u64,
    entries: Vec<QueueEntry>,
    deliveries: Vec<(Uuid, Instant)>,
}

struct QueueEntry {
    id: u64,
    job: IngestJob,
    invisible_until: Option<Instant>,
}

impl MemoryJobQueue {
    pub fn new(visibility_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueInner::default())),
            visibility_timeout,
        }
    }

    pub fn push(&self, job: IngestJob) {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push(QueueEntry {
            id,
            job,
            invisible_until: None,
        });
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Instants at which the given document's job was delivered.
    pub fn deliveries_of(&self, document_id: Uuid) -> Vec<Instant> {
        self.inner
            .lock()
            .unwrap()
            .deliveries
            .iter()
            .filter(|(id, _)| *id == document_id)
            .map(|(_, at)| *at)
            .collect()
    }
}

pub struct MemoryLease {
    inner: Arc<Mutex<QueueInner>>,
    id: u64,
}

#[async_trait]
impl JobLease for MemoryLease {
    async fn complete(self) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .entries
            .retain(|entry| entry.id != self.id);
        Ok(())
    }
}

#[async_trait]
impl JobSource for MemoryJobQueue {
    type Lease = MemoryLease;

    async fn poll(&mut self) -> Result<Option<(IngestJob, Self::Lease)>> {
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap();

        let Some(index) = inner
            .entries
            .iter()
            .position(|entry| entry.invisible_until.is_none_or(|until| until <= now))
        else {
            return Ok(None);
        };

        inner.entries[index].invisible_until = Some(now + self.visibility_timeout);
        let id = inner.entries[index].id;
        let job = inner.entries[index].job.clone();
        inner.deliveries.push((job.document_id, now));

        let lease = MemoryLease {
            inner: self.inner.clone(),
            id,
        };

        Ok(Some((job, lease)))
    }
}
