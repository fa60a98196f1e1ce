//! Worker error types.
//!
//! One variant per failure class in the ingestion pipeline. Every
//! per-document failure is recorded onto the document's `processing_error`
//! field via [`std::fmt::Display`], so messages are written for operators.

/// Result type alias for worker operations.
pub type Result<T, E = WorkerError> = std::result::Result<T, E>;

/// Worker error type.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The declared media type has no extraction strategy.
    #[error("unsupported file type: {0}")]
    UnsupportedMediaType(String),

    /// The bytes are malformed or corrupt for the declared media type.
    #[error("text extraction failed: {0}")]
    Extraction(String),

    /// Extraction produced less than the minimum meaningful text.
    #[error("no meaningful text extracted from document")]
    EmptyExtraction,

    /// Chunking produced zero chunks.
    #[error("no chunks generated from document")]
    NoChunksGenerated,

    /// The embedding provider call failed (transport, auth, rate limit).
    #[error("embedding provider error: {0}")]
    Embedding(String),

    /// Downloading the document bytes from storage failed.
    #[error("download failure: {0}")]
    StorageDownload(#[from] savant_opendal::StorageError),

    /// A database operation failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] savant_postgres::PgError),

    /// A queue read/ack operation failed.
    #[error("queue transport error: {0}")]
    Queue(#[from] savant_nats::Error),

    /// Invalid worker configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl WorkerError {
    /// Creates an extraction error.
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Creates an embedding error.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns whether this failure belongs to a single document rather
    /// than to shared infrastructure.
    ///
    /// Document-scoped failures (bad bytes, unsupported type, empty text)
    /// will fail the same way on every redelivery; infrastructure failures
    /// may clear up on their own.
    pub fn is_document_scoped(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMediaType(_)
                | Self::Extraction(_)
                | Self::EmptyExtraction
                | Self::NoChunksGenerated
        )
    }
}

impl From<savant_core::Error> for WorkerError {
    fn from(error: savant_core::Error) -> Self {
        Self::Embedding(error.to_string())
    }
}
