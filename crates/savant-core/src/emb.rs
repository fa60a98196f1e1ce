//! Embedding service contract.
//!
//! Defines the interface between the ingestion/retrieval pipeline and hosted
//! embedding providers. Concrete implementations live in provider crates;
//! tests use the deterministic mock from the test crate.

use async_trait::async_trait;

use crate::{Result, ServiceHealth};

/// Contract for hosted text embedding services.
///
/// Implementations convert text into fixed-dimension vectors. Batch calls
/// MUST preserve input order: index `i` of the output corresponds to index
/// `i` of the input, since callers zip chunks with embeddings positionally.
///
/// A provider failure (transport, auth, rate limit) surfaces as an error and
/// is never substituted with a zero vector; a missing embedding must not be
/// silently stored.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Returns the fixed output dimension of the underlying model.
    fn dimensions(&self) -> usize;

    /// Embeds a single text into one vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embeds a non-empty ordered sequence of texts into a parallel
    /// ordered sequence of vectors.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Checks the health of the embedding service.
    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}
