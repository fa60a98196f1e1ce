//! Embedding models and provider.

mod model;
mod provider;

pub use model::EmbeddingModel;
pub use provider::EmbeddingProvider;
