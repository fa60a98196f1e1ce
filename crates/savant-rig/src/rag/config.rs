//! Retrieval configuration.

use serde::{Deserialize, Serialize};

/// Minimum cosine similarity for a chunk to be considered relevant.
///
/// On the [0, 1] similarity scale; matches below this are treated as noise
/// rather than returned as weak context.
pub const DEFAULT_MIN_SCORE: f64 = 0.78;

/// Default number of top matches returned per query.
pub const DEFAULT_TOP_K: u32 = 5;

/// Configuration for knowledge-base retrieval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RagConfig {
    /// Minimum similarity score for a chunk to be returned.
    pub min_score: f64,
    /// Default result count when the caller does not specify one.
    pub top_k: u32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RagConfig {
    /// Sets the minimum similarity score.
    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Sets the default result count.
    #[must_use]
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RagConfig::default();
        assert!((config.min_score - 0.78).abs() < f64::EPSILON);
        assert_eq!(config.top_k, 5);
    }

    #[test]
    fn test_builders() {
        let config = RagConfig::default().with_min_score(0.5).with_top_k(10);
        assert!((config.min_score - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.top_k, 10);
    }
}
