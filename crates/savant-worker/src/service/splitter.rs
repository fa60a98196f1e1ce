//! Token-budget text chunking for embeddings.
//!
//! Splits cleaned document text into overlapping chunks bounded by a
//! measured token count. Token length is measured with the same tokenizer
//! family the embedding model consumes (`cl100k_base`), so chunk boundaries
//! respect the model's actual token budget rather than a character proxy.
//! `text-splitter` supplies the layered separator strategy: it prefers
//! paragraph breaks, then line breaks, then sentence boundaries, then
//! words, and only hard-splits when nothing smaller fits the budget.

use std::sync::Arc;

use text_splitter::{ChunkConfig, ChunkSizer, TextSplitter};
use tiktoken_rs::{CoreBPE, cl100k_base};

use crate::{Result, WorkerError};

/// Target chunk size in tokens.
pub const DEFAULT_CHUNK_SIZE_TOKENS: usize = 800;

/// Overlap between consecutive chunks in tokens.
///
/// Each chunk after the first repeats the trailing tokens of its
/// predecessor so context is not lost at a cut boundary.
pub const DEFAULT_CHUNK_OVERLAP_TOKENS: usize = 200;

/// Configuration for the text splitter service.
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Maximum chunk size in tokens.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in tokens.
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE_TOKENS,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP_TOKENS,
        }
    }
}

impl SplitterConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(WorkerError::configuration("chunk size must be positive"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(WorkerError::configuration(
                "chunk overlap must be smaller than chunk size",
            ));
        }
        Ok(())
    }
}

/// A chunk of text with its measured token count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// The chunk content.
    pub content: String,
    /// Token count per the shared tokenizer.
    pub token_count: usize,
}

/// Token counter backed by the `cl100k_base` BPE.
#[derive(Clone)]
struct TokenSizer {
    bpe: Arc<CoreBPE>,
}

impl TokenSizer {
    fn cl100k() -> Result<Self> {
        let bpe = cl100k_base().map_err(|e| WorkerError::configuration(e.to_string()))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }

    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl ChunkSizer for TokenSizer {
    fn size(&self, chunk: &str) -> usize {
        self.count(chunk)
    }
}

/// Service for splitting text into token-bounded overlapping chunks.
#[derive(Clone)]
pub struct TextSplitterService {
    config: SplitterConfig,
    sizer: TokenSizer,
}

impl TextSplitterService {
    /// Creates a new text splitter service with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config is inconsistent or the
    /// tokenizer tables cannot be loaded.
    pub fn new(config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sizer: TokenSizer::cl100k()?,
        })
    }

    /// Creates a text splitter service with default settings.
    pub fn with_defaults() -> Result<Self> {
        Self::new(SplitterConfig::default())
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Measures the token length of a text.
    pub fn token_count(&self, text: &str) -> usize {
        self.sizer.count(text)
    }

    /// Splits text into an ordered, non-empty sequence of overlapping chunks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::NoChunksGenerated`] when the input yields zero
    /// chunks (e.g. an empty string after cleaning). Ingestion must never
    /// mark a document completed with zero chunks, so this is a hard failure
    /// rather than a silent empty result.
    pub fn split(&self, text: &str) -> Result<Vec<TextChunk>> {
        let chunk_config = ChunkConfig::new(self.config.chunk_size)
            .with_sizer(self.sizer.clone())
            .with_overlap(self.config.chunk_overlap)
            .expect("valid overlap configuration");

        let chunks: Vec<TextChunk> = TextSplitter::new(chunk_config)
            .chunks(text)
            .map(|chunk| TextChunk {
                content: chunk.to_string(),
                token_count: self.sizer.count(chunk),
            })
            .collect();

        if chunks.is_empty() {
            return Err(WorkerError::NoChunksGenerated);
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TextSplitterService {
        TextSplitterService::with_defaults().expect("splitter service")
    }

    /// Varied text that measures well past the default chunk budget.
    fn long_text() -> String {
        (0..400)
            .map(|i| {
                format!(
                    "Sentence number {i} describes the billing policy for plan tier {}. ",
                    i % 7
                )
            })
            .collect()
    }

    #[test]
    fn test_config_validation() {
        assert!(SplitterConfig::default().validate().is_ok());

        let zero = SplitterConfig {
            chunk_size: 0,
            chunk_overlap: 0,
        };
        assert!(zero.validate().is_err());

        let inverted = SplitterConfig {
            chunk_size: 100,
            chunk_overlap: 100,
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = service().split("A short note about invoices.").unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "A short note about invoices.");
    }

    #[test]
    fn test_long_text_produces_multiple_bounded_chunks() {
        let service = service();
        let text = long_text();
        assert!(service.token_count(&text) > DEFAULT_CHUNK_SIZE_TOKENS);

        let chunks = service.split(&text).unwrap();
        assert!(chunks.len() > 1, "expected multiple chunks");

        for chunk in &chunks {
            assert!(
                chunk.token_count <= DEFAULT_CHUNK_SIZE_TOKENS,
                "chunk exceeds token budget: {} tokens",
                chunk.token_count
            );
            assert_eq!(chunk.token_count, service.token_count(&chunk.content));
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let service = service();
        let chunks = service.split(&long_text()).unwrap();
        assert!(chunks.len() > 1);

        for pair in chunks.windows(2) {
            // The head of each chunk repeats trailing content of the previous
            // one; with distinct numbered sentences a shared span proves it.
            let head: String = pair[1].content.chars().take(40).collect();
            assert!(
                pair[0].content.contains(head.trim()),
                "no overlap between consecutive chunks"
            );
        }
    }

    #[test]
    fn test_empty_input_is_hard_failure() {
        let err = service().split("").unwrap_err();
        assert!(matches!(err, WorkerError::NoChunksGenerated));

        let err = service().split("   ").unwrap_err();
        assert!(matches!(err, WorkerError::NoChunksGenerated));
    }

    #[test]
    fn test_token_count_is_measured_not_estimated() {
        let service = service();
        // Subword tokenization: an out-of-vocabulary word spans several
        // tokens, not one per word or one per character.
        let word = "pneumonoultramicroscopicsilicovolcanoconiosis";
        let count = service.token_count(word);
        assert!(count >= 2 && count < word.len());
    }
}
