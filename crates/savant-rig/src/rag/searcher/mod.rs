//! Semantic search over a savant's knowledge base.

mod retrieved;

use savant_core::emb::EmbeddingService;
use savant_postgres::model::ScoredDocumentChunk;
use savant_postgres::query::DocumentChunkRepository;
use savant_postgres::{PgClient, Vector};
use uuid::Uuid;

pub use self::retrieved::RetrievedChunk;
use crate::provider::EmbeddingProvider;
use crate::rag::RagConfig;
use crate::{Error, Result, TRACING_TARGET_RAG};

/// Sentinel returned when no chunk passes the relevance threshold.
///
/// The answering model must receive an explicit signal rather than an empty
/// collection, so it does not hallucinate an answer from nothing.
pub const NO_RELEVANT_INFORMATION: &str = "No relevant information found in the knowledge base.";

/// Semantic search service bound to one savant (knowledge base).
///
/// The typed [`query`](KnowledgeSearcher::query) path is used by callers that
/// want structured results; [`search`](KnowledgeSearcher::search) is the tool
/// surface handed to the answering model, which always returns a string: a
/// lookup failure degrades the conversation to "could not search" instead of
/// aborting the turn.
pub struct KnowledgeSearcher {
    provider: EmbeddingProvider,
    db: PgClient,
    savant_id: Uuid,
    config: RagConfig,
}

impl KnowledgeSearcher {
    /// Creates a searcher for the given savant's knowledge base.
    pub fn new(provider: EmbeddingProvider, db: PgClient, savant_id: Uuid) -> Self {
        Self {
            provider,
            db,
            savant_id,
            config: RagConfig::default(),
        }
    }

    /// Overrides the retrieval configuration.
    #[must_use]
    pub fn with_config(mut self, config: RagConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the savant scope of this searcher.
    pub fn savant_id(&self) -> Uuid {
        self.savant_id
    }

    /// Searches for relevant chunks, returning structured results.
    ///
    /// The query is cleaned identically to ingestion-time cleaning (newlines
    /// become spaces) before embedding; embeddings of differently-normalized
    /// text are not guaranteed comparable.
    #[tracing::instrument(skip(self, query), fields(savant_id = %self.savant_id), target = TRACING_TARGET_RAG)]
    pub async fn query(&self, query: &str, limit: u32) -> Result<Vec<RetrievedChunk>> {
        let cleaned = clean_query(query);

        let embedding = self
            .provider
            .embed(&cleaned)
            .await
            .map_err(|e| Error::embedding(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET_RAG,
            dimensions = embedding.len(),
            "Generated query embedding"
        );

        let query_vector = Vector::from(embedding);

        let mut conn = self
            .db
            .get_connection()
            .await
            .map_err(|e| Error::retrieval(format!("failed to get connection: {e}")))?;

        let scored: Vec<ScoredDocumentChunk> = conn
            .search_scored_chunks_in_savant(
                query_vector,
                self.savant_id,
                self.config.min_score,
                limit as i64,
            )
            .await
            .map_err(|e| Error::retrieval(format!("vector search failed: {e}")))?;

        tracing::debug!(
            target: TRACING_TARGET_RAG,
            matches = scored.len(),
            min_score = self.config.min_score,
            "Similarity search complete"
        );

        Ok(scored.into_iter().map(RetrievedChunk::from).collect())
    }

    /// Searches the knowledge base and formats the results as tool output.
    ///
    /// Uses the configured default result count.
    pub async fn search(&self, query: &str) -> String {
        self.search_with_limit(query, self.config.top_k).await
    }

    /// Searches the knowledge base with an explicit result count.
    ///
    /// Never returns an error: failures come back as a descriptive string so
    /// the enclosing conversation turn survives a broken lookup.
    #[tracing::instrument(skip(self, query), fields(savant_id = %self.savant_id), target = TRACING_TARGET_RAG)]
    pub async fn search_with_limit(&self, query: &str, limit: u32) -> String {
        render_outcome(self.query(query, limit).await)
    }
}

/// Renders a retrieval outcome as the textual tool contract.
fn render_outcome(outcome: Result<Vec<RetrievedChunk>>) -> String {
    let chunks = match outcome {
        Ok(chunks) => chunks,
        Err(Error::Embedding(message)) => {
            tracing::error!(
                target: TRACING_TARGET_RAG,
                error = %message,
                "Failed to generate query embedding"
            );
            return format!("Error generating embedding: {message}");
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_RAG,
                error = %error,
                "Failed to search knowledge base"
            );
            return format!("Error searching knowledge base: {error}");
        }
    };

    if chunks.is_empty() {
        tracing::debug!(target: TRACING_TARGET_RAG, "No relevant chunks found");
        return NO_RELEVANT_INFORMATION.to_string();
    }

    format_results(&chunks)
}

/// Cleans a query the same way ingestion cleans document text.
fn clean_query(query: &str) -> String {
    query.replace('\n', " ").trim().to_string()
}

/// Formats retrieved chunks as the textual tool contract.
fn format_results(chunks: &[RetrievedChunk]) -> String {
    let context_parts: Vec<String> = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "[Source {} - Relevance: {}]\n{}",
                i + 1,
                chunk.relevance_percent(),
                chunk.content
            )
        })
        .collect();

    format!(
        "Found {} relevant document(s):\n\n{}",
        chunks.len(),
        context_parts.join("\n\n---\n\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str, score: f64) -> RetrievedChunk {
        RetrievedChunk {
            chunk_id: Uuid::now_v7(),
            document_id: Uuid::now_v7(),
            content: content.to_string(),
            score,
        }
    }

    #[test]
    fn test_clean_query_replaces_newlines() {
        assert_eq!(clean_query("what is\nthe refund\npolicy?"), "what is the refund policy?");
        assert_eq!(clean_query("  padded  "), "padded");
        assert_eq!(clean_query("\n\n"), "");
    }

    #[test]
    fn test_format_single_result() {
        let formatted = format_results(&[chunk("Refunds are issued within 30 days.", 0.91)]);

        assert!(formatted.starts_with("Found 1 relevant document(s):\n\n"));
        assert!(formatted.contains("[Source 1 - Relevance: 91.00%]"));
        assert!(formatted.contains("Refunds are issued within 30 days."));
        assert!(!formatted.contains("---"));
    }

    #[test]
    fn test_format_multiple_results_joined_by_separator() {
        let formatted = format_results(&[
            chunk("First chunk.", 0.95),
            chunk("Second chunk.", 0.85),
        ]);

        assert!(formatted.starts_with("Found 2 relevant document(s):"));
        assert!(formatted.contains("[Source 1 - Relevance: 95.00%]\nFirst chunk."));
        assert!(formatted.contains("[Source 2 - Relevance: 85.00%]\nSecond chunk."));
        assert!(formatted.contains("\n\n---\n\n"));
    }

    #[test]
    fn test_sources_are_one_indexed_and_ordered() {
        let formatted = format_results(&[
            chunk("a", 0.9),
            chunk("b", 0.8),
            chunk("c", 0.79),
        ]);

        let first = formatted.find("[Source 1").unwrap();
        let second = formatted.find("[Source 2").unwrap();
        let third = formatted.find("[Source 3").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_no_passing_results_returns_sentinel() {
        // A query whose best match falls below the threshold yields zero
        // chunks from the search; the caller must see the explicit
        // sentinel, not an empty list or a weak match.
        let rendered = render_outcome(Ok(vec![]));
        assert_eq!(rendered, NO_RELEVANT_INFORMATION);
    }

    #[test]
    fn test_embedding_failure_degrades_to_string() {
        let rendered = render_outcome(Err(Error::embedding("provider error: openai: 429")));
        assert!(rendered.starts_with("Error generating embedding:"));
        assert!(rendered.contains("429"));
    }

    #[test]
    fn test_search_failure_degrades_to_string() {
        let rendered = render_outcome(Err(Error::retrieval("vector search failed: timeout")));
        assert!(rendered.starts_with("Error searching knowledge base:"));
        assert!(rendered.contains("timeout"));
    }

    #[test]
    fn test_successful_outcome_is_formatted() {
        let rendered = render_outcome(Ok(vec![chunk("Shipping takes two days.", 0.88)]));
        assert!(rendered.contains("Found 1 relevant document(s):"));
        assert!(rendered.contains("Shipping takes two days."));
    }
}
