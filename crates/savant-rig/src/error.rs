//! Error types for savant-rig.

use std::fmt;

/// Result type alias for rig operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during rig operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Provider error (API call failed, rate limited, etc.)
    #[error("provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// RAG retrieval error.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a provider error.
    pub fn provider(provider: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an embedding error.
    pub fn embedding(message: impl fmt::Display) -> Self {
        Self::Embedding(message.to_string())
    }

    /// Creates a retrieval error.
    pub fn retrieval(message: impl fmt::Display) -> Self {
        Self::Retrieval(message.to_string())
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }
}

impl From<Error> for savant_core::Error {
    fn from(error: Error) -> Self {
        use savant_core::ErrorKind;

        let kind = match &error {
            Error::Provider { .. } | Error::Embedding(_) => ErrorKind::ExternalError,
            Error::Retrieval(_) => ErrorKind::InternalError,
            Error::Config(_) => ErrorKind::Configuration,
            Error::Serialization(_) => ErrorKind::Serialization,
        };

        savant_core::Error::new(kind).with_message(error.to_string())
    }
}
