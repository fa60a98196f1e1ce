//! Document store contract for ingestion bookkeeping.

use async_trait::async_trait;
use savant_nats::queue::IngestJob;
use savant_postgres::model::{NewDocumentChunk, UpdateDocument};
use savant_postgres::query::{DocumentChunkRepository, DocumentRepository};
use savant_postgres::{PgClient, Vector};
use uuid::Uuid;

use crate::Result;

/// One chunk ready for persistence.
#[derive(Debug, Clone)]
pub struct ChunkRecord {
    /// Chunk text content.
    pub content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// Zero-based index within the document.
    pub chunk_index: i32,
    /// Token count per the shared tokenizer.
    pub token_count: i32,
}

/// Mutations the ingestion pipeline performs on the document store.
///
/// The document's `status` field is the externally observable source of
/// truth for ingestion progress; each method below is one coarse-grained
/// transition of that state machine.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Marks a document as processing and records the start timestamp.
    async fn mark_processing(&self, document_id: Uuid) -> Result<()>;

    /// Marks a document as completed with its final chunk count, records
    /// the end timestamp, and clears any prior error.
    async fn mark_completed(&self, document_id: Uuid, chunk_count: usize) -> Result<()>;

    /// Marks a document as failed with the error message.
    async fn mark_failed(&self, document_id: Uuid, error: &str) -> Result<()>;

    /// Atomically replaces the document's chunk set with the given records.
    ///
    /// Returns the number of chunks written. Implementations must guarantee
    /// that retrieval never observes a partial or mixed chunk set.
    async fn replace_chunks(&self, job: &IngestJob, chunks: Vec<ChunkRecord>) -> Result<usize>;
}

#[async_trait]
impl DocumentStore for PgClient {
    async fn mark_processing(&self, document_id: Uuid) -> Result<()> {
        let mut conn = self.get_connection().await?;
        conn.update_document(document_id, UpdateDocument::processing_started())
            .await?;
        Ok(())
    }

    async fn mark_completed(&self, document_id: Uuid, chunk_count: usize) -> Result<()> {
        let mut conn = self.get_connection().await?;
        conn.update_document(document_id, UpdateDocument::completed(chunk_count))
            .await?;
        Ok(())
    }

    async fn mark_failed(&self, document_id: Uuid, error: &str) -> Result<()> {
        let mut conn = self.get_connection().await?;
        conn.update_document(document_id, UpdateDocument::failed(error))
            .await?;
        Ok(())
    }

    async fn replace_chunks(&self, job: &IngestJob, chunks: Vec<ChunkRecord>) -> Result<usize> {
        let new_chunks: Vec<NewDocumentChunk> = chunks
            .into_iter()
            .map(|record| NewDocumentChunk {
                account_id: job.account_id,
                savant_id: job.savant_id,
                document_id: job.document_id,
                content: record.content,
                embedding: Vector::from(record.embedding),
                chunk_index: record.chunk_index,
                token_count: record.token_count,
            })
            .collect();

        let mut conn = self.get_connection().await?;
        let created = conn
            .replace_document_chunks(job.document_id, new_chunks)
            .await?;

        Ok(created.len())
    }
}
