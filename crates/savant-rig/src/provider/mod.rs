//! Hosted AI providers.

mod credentials;
mod embedding;

pub use credentials::Credentials;
pub use embedding::{EmbeddingModel, EmbeddingProvider};
