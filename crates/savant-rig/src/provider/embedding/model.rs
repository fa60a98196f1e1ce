//! Type-safe embedding model references.

use serde::{Deserialize, Serialize};

/// OpenAI embedding models.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbeddingModel {
    /// text-embedding-3-small (1536 dimensions)
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    TextEmbedding3Large,
    /// text-embedding-ada-002 (legacy, 1536 dimensions)
    #[default]
    TextEmbeddingAda002,
}

impl EmbeddingModel {
    /// Returns the provider-side model name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextEmbedding3Small => "text-embedding-3-small",
            Self::TextEmbedding3Large => "text-embedding-3-large",
            Self::TextEmbeddingAda002 => "text-embedding-ada-002",
        }
    }

    /// Returns the fixed output dimension of the model.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::TextEmbedding3Small => 1536,
            Self::TextEmbedding3Large => 3072,
            Self::TextEmbeddingAda002 => 1536,
        }
    }
}

impl std::fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_names_and_dimensions() {
        assert_eq!(EmbeddingModel::TextEmbeddingAda002.as_str(), "text-embedding-ada-002");
        assert_eq!(EmbeddingModel::TextEmbeddingAda002.dimensions(), 1536);
        assert_eq!(EmbeddingModel::TextEmbedding3Large.dimensions(), 3072);
    }

    #[test]
    fn test_default_is_ada() {
        assert_eq!(EmbeddingModel::default(), EmbeddingModel::TextEmbeddingAda002);
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&EmbeddingModel::TextEmbedding3Small).unwrap();
        assert_eq!(json, "\"text-embedding3-small\"");
    }
}
