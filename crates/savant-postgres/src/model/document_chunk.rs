//! Document chunk model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use pgvector::Vector;
use uuid::Uuid;

use crate::schema::document_chunks;

/// A contiguous span of a document's extracted text plus its embedding.
///
/// Chunks are the atomic unit of retrieval. Each chunk inherits its
/// document's account/savant scope so retrieval never crosses tenants, and
/// `chunk_index` values form a gapless zero-based sequence per document.
/// Chunks are immutable once created and replaced wholesale on re-ingestion.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentChunk {
    /// Unique chunk identifier.
    pub id: Uuid,
    /// Account that owns this chunk.
    pub account_id: Uuid,
    /// Knowledge base (savant) this chunk belongs to.
    pub savant_id: Uuid,
    /// Document this chunk was extracted from.
    pub document_id: Uuid,
    /// The chunk text content.
    pub content: String,
    /// Vector embedding for semantic search (1536 dimensions for OpenAI ada-002).
    pub embedding: Vector,
    /// Zero-based index of this chunk within the document.
    pub chunk_index: i32,
    /// Number of tokens in the chunk, per the embedding model's tokenizer.
    pub token_count: i32,
    /// Timestamp when the chunk was created.
    pub created_at: Timestamp,
}

/// Data for creating a new document chunk.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentChunk {
    /// Account ID.
    pub account_id: Uuid,
    /// Savant (knowledge base) ID.
    pub savant_id: Uuid,
    /// Document ID.
    pub document_id: Uuid,
    /// Chunk text content.
    pub content: String,
    /// Vector embedding.
    pub embedding: Vector,
    /// Chunk index within the document.
    pub chunk_index: i32,
    /// Token count.
    pub token_count: i32,
}

impl DocumentChunk {
    /// Returns the embedding dimensions.
    pub fn embedding_dimensions(&self) -> usize {
        self.embedding.as_slice().len()
    }

    /// Returns the content length in bytes.
    pub fn content_size(&self) -> usize {
        self.content.len()
    }
}

/// A document chunk with its similarity score.
///
/// Returned from similarity search queries.
#[derive(Debug, Clone)]
pub struct ScoredDocumentChunk {
    /// The document chunk.
    pub chunk: DocumentChunk,
    /// Similarity score (0.0 to 1.0, higher is more similar).
    pub score: f64,
}

impl ScoredDocumentChunk {
    /// Returns a reference to the chunk.
    pub fn chunk(&self) -> &DocumentChunk {
        &self.chunk
    }

    /// Returns the similarity score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Consumes self and returns the inner chunk.
    pub fn into_chunk(self) -> DocumentChunk {
        self.chunk
    }
}
