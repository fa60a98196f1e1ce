//! OpenAI embedding provider over rig-core.

use std::sync::Arc;

use async_trait::async_trait;
use rig::embeddings::{Embedding, EmbeddingModel as RigEmbeddingModel};
use rig::prelude::EmbeddingsClient;
use rig::providers::openai;
use savant_core::emb::EmbeddingService;
use savant_core::{IntoProvider, ServiceHealth};

use super::model::EmbeddingModel;
use crate::provider::Credentials;
use crate::{Error, Result, TRACING_TARGET_EMBEDDING};

/// Embedding provider wrapping a rig OpenAI embedding model.
///
/// This is a cheaply cloneable wrapper around an `Arc` of the connected
/// model. Batch calls preserve input order: index `i` of the output
/// corresponds to index `i` of the input.
#[derive(Clone)]
pub struct EmbeddingProvider(Arc<ProviderInner>);

struct ProviderInner {
    model: openai::EmbeddingModel,
    model_ref: EmbeddingModel,
}

#[async_trait]
impl IntoProvider for EmbeddingProvider {
    type Params = EmbeddingModel;
    type Credentials = Credentials;

    async fn create(
        params: Self::Params,
        credentials: Self::Credentials,
    ) -> savant_core::Result<Self> {
        let client = openai::Client::new(&credentials.api_key)
            .map_err(|e| Error::provider("openai", e.to_string()))?;

        let model = client.embedding_model_with_ndims(params.as_str(), params.dimensions());

        tracing::debug!(
            target: TRACING_TARGET_EMBEDDING,
            model = %params,
            dimensions = params.dimensions(),
            "Connected embedding provider"
        );

        Ok(Self(Arc::new(ProviderInner {
            model,
            model_ref: params,
        })))
    }
}

impl EmbeddingProvider {
    /// Returns the model name.
    pub fn model_name(&self) -> &'static str {
        self.0.model_ref.as_str()
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        "openai"
    }

    /// Embed a single text document.
    pub async fn embed_text(&self, text: &str) -> Result<Embedding> {
        self.0
            .model
            .embed_text(text)
            .await
            .map_err(|e| Error::provider(self.provider_name(), e.to_string()))
    }

    /// Embed multiple text documents, preserving input order.
    pub async fn embed_texts(
        &self,
        texts: impl IntoIterator<Item = String> + Send,
    ) -> Result<Vec<Embedding>> {
        self.0
            .model
            .embed_texts(texts)
            .await
            .map_err(|e| Error::provider(self.provider_name(), e.to_string()))
    }
}

#[async_trait]
impl EmbeddingService for EmbeddingProvider {
    fn dimensions(&self) -> usize {
        self.0.model_ref.dimensions()
    }

    async fn embed(&self, text: &str) -> savant_core::Result<Vec<f32>> {
        let embedding = self.embed_text(text).await?;
        Ok(embedding.vec.iter().map(|&x| x as f32).collect())
    }

    async fn embed_batch(&self, texts: &[String]) -> savant_core::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Err(savant_core::Error::invalid_input()
                .with_message("embedding batch must not be empty"));
        }

        let embeddings = self.embed_texts(texts.to_vec()).await?;

        if embeddings.len() != texts.len() {
            return Err(Error::embedding(format!(
                "embedding count mismatch: expected {}, got {}",
                texts.len(),
                embeddings.len()
            ))
            .into());
        }

        Ok(embeddings
            .into_iter()
            .map(|e| e.vec.iter().map(|&x| x as f32).collect())
            .collect())
    }

    async fn health_check(&self) -> savant_core::Result<ServiceHealth> {
        let start = std::time::Instant::now();
        match self.embed_text("ping").await {
            Ok(_) => Ok(ServiceHealth::healthy().with_response_time(start.elapsed())),
            Err(e) => Ok(ServiceHealth::unhealthy(e.to_string())),
        }
    }
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .field("ndims", &self.0.model_ref.dimensions())
            .finish()
    }
}
