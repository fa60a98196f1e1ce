//! Retrieved chunk type.

use savant_postgres::model::ScoredDocumentChunk;
use uuid::Uuid;

/// A chunk retrieved by similarity search, with its score.
///
/// Ephemeral: produced per query, never persisted.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// Chunk identifier.
    pub chunk_id: Uuid,
    /// Document the chunk belongs to.
    pub document_id: Uuid,
    /// The chunk text content.
    pub content: String,
    /// Similarity score (0.0 to 1.0, higher is more similar).
    pub score: f64,
}

impl RetrievedChunk {
    /// Returns the score formatted as a relevance percentage, e.g. `84.32%`.
    pub fn relevance_percent(&self) -> String {
        format!("{:.2}%", self.score * 100.0)
    }
}

impl From<ScoredDocumentChunk> for RetrievedChunk {
    fn from(scored: ScoredDocumentChunk) -> Self {
        let score = scored.score;
        let chunk = scored.into_chunk();
        Self {
            chunk_id: chunk.id,
            document_id: chunk.document_id,
            content: chunk.content,
            score,
        }
    }
}
