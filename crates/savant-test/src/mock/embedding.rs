//! Mock embedding service for testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use savant_core::emb::EmbeddingService;
use savant_core::{Error, Result, ServiceHealth};

/// Default vector dimension for the mock service.
const DEFAULT_DIMENSIONS: usize = 1536;

/// Deterministic mock embedding service.
///
/// Embeds text into hash-seeded unit vectors: the same input always yields
/// the same vector, and batch output order matches input order, so tests can
/// verify the batch/single agreement contract. A provider failure can be
/// injected to exercise error paths.
#[derive(Clone)]
pub struct MockEmbeddingService {
    inner: Arc<MockInner>,
}

struct MockInner {
    dimensions: usize,
    failure: Mutex<Option<String>>,
    embed_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl Default for MockEmbeddingService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbeddingService {
    /// Creates a mock with the default (1536) dimension.
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_DIMENSIONS)
    }

    /// Creates a mock with a custom vector dimension.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            inner: Arc::new(MockInner {
                dimensions,
                failure: Mutex::new(None),
                embed_calls: AtomicUsize::new(0),
                batch_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Makes every subsequent embedding call fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.inner.failure.lock().unwrap() = Some(message.into());
    }

    /// Clears any injected failure.
    pub fn recover(&self) {
        *self.inner.failure.lock().unwrap() = None;
    }

    /// Number of single-embed calls made so far.
    pub fn embed_calls(&self) -> usize {
        self.inner.embed_calls.load(Ordering::SeqCst)
    }

    /// Number of batch-embed calls made so far.
    pub fn batch_calls(&self) -> usize {
        self.inner.batch_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<()> {
        match self.inner.failure.lock().unwrap().as_ref() {
            Some(message) => Err(Error::external_error().with_message(message.clone())),
            None => Ok(()),
        }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        deterministic_unit_vector(text, self.inner.dimensions)
    }
}

#[async_trait]
impl EmbeddingService for MockEmbeddingService {
    fn dimensions(&self) -> usize {
        self.inner.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.inner.embed_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.inner.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        if texts.is_empty() {
            return Err(Error::invalid_input().with_message("embedding batch must not be empty"));
        }

        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        match self.inner.failure.lock().unwrap().as_ref() {
            Some(message) => Ok(ServiceHealth::unhealthy(message.clone())),
            None => Ok(ServiceHealth::healthy()),
        }
    }
}

/// Produces a unit vector seeded by an FNV-1a hash of the text.
fn deterministic_unit_vector(text: &str, dimensions: usize) -> Vec<f32> {
    let mut state = fnv1a(text.as_bytes());

    let mut vector: Vec<f32> = (0..dimensions)
        .map(|_| {
            state = splitmix64(state);
            // Map the top 32 bits onto [-1.0, 1.0)
            ((state >> 32) as f32 / (u32::MAX as f32 / 2.0)) - 1.0
        })
        .collect();

    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }

    vector
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embedding_is_deterministic() {
        let mock = MockEmbeddingService::with_dimensions(64);

        let a = mock.embed("the same text").await.unwrap();
        let b = mock.embed("the same text").await.unwrap();
        let c = mock.embed("different text").await.unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn test_vectors_are_normalized() {
        let mock = MockEmbeddingService::with_dimensions(32);
        let v = mock.embed("normalize me").await.unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_batch_agrees_with_single() {
        let mock = MockEmbeddingService::with_dimensions(16);
        let texts: Vec<String> = ["alpha", "beta", "gamma"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let batch = mock.embed_batch(&texts).await.unwrap();
        assert_eq!(batch.len(), texts.len());

        for (i, text) in texts.iter().enumerate() {
            let single = mock.embed(text).await.unwrap();
            assert_eq!(batch[i], single, "batch[{i}] disagrees with embed({text})");
        }
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let mock = MockEmbeddingService::new();
        assert!(mock.embed_batch(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_failure_injection_and_recovery() {
        let mock = MockEmbeddingService::with_dimensions(8);

        mock.fail_with("rate limited");
        let err = mock.embed("text").await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));

        mock.recover();
        assert!(mock.embed("text").await.is_ok());
    }

    #[tokio::test]
    async fn test_call_counters() {
        let mock = MockEmbeddingService::with_dimensions(8);
        let texts = vec!["a".to_string(), "b".to_string()];

        mock.embed("x").await.unwrap();
        mock.embed_batch(&texts).await.unwrap();

        assert_eq!(mock.embed_calls(), 1);
        assert_eq!(mock.batch_calls(), 1);
    }
}
