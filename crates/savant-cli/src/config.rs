//! Command-line configuration.

use anyhow::Context;
use clap::{Args, Parser};
use savant_nats::NatsConfig;
use savant_opendal::StorageConfig;
use savant_postgres::PgConfig;
use savant_rig::provider::EmbeddingModel;
use savant_worker::WorkerConfig;

/// Savant document ingestion worker.
#[derive(Debug, Parser)]
#[command(name = "savant-cli", version, about)]
pub struct Cli {
    /// Database connection settings
    #[command(flatten)]
    pub postgres: PgConfig,

    /// NATS connection settings
    #[command(flatten)]
    pub nats: NatsConfig,

    /// Object storage settings
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Worker loop settings
    #[command(flatten)]
    pub worker: WorkerConfig,

    /// AI provider settings
    #[command(flatten)]
    pub ai: AiConfig,
}

/// Hosted AI provider configuration.
#[derive(Debug, Args)]
pub struct AiConfig {
    /// OpenAI API key
    #[arg(long = "openai-api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Embedding model name
    #[arg(
        long = "embedding-model",
        env = "EMBEDDING_MODEL",
        default_value = "text-embedding-ada-002"
    )]
    pub embedding_model: String,
}

impl AiConfig {
    /// Resolves the configured embedding model name.
    pub fn embedding_model(&self) -> anyhow::Result<EmbeddingModel> {
        match self.embedding_model.as_str() {
            "text-embedding-3-small" => Ok(EmbeddingModel::TextEmbedding3Small),
            "text-embedding-3-large" => Ok(EmbeddingModel::TextEmbedding3Large),
            "text-embedding-ada-002" => Ok(EmbeddingModel::TextEmbeddingAda002),
            other => anyhow::bail!("unknown embedding model: {other}"),
        }
    }
}

impl Cli {
    /// Validates the whole configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.postgres
            .validate()
            .map_err(|e| anyhow::anyhow!(e))
            .context("invalid database configuration")?;
        self.nats
            .validate()
            .map_err(|e| anyhow::anyhow!(e))
            .context("invalid NATS configuration")?;
        self.worker
            .validate()
            .map_err(|e| anyhow::anyhow!(e))
            .context("invalid worker configuration")?;
        self.ai.embedding_model().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_model_resolution() {
        let ai = AiConfig {
            openai_api_key: "sk-test".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
        };
        assert_eq!(
            ai.embedding_model().unwrap(),
            EmbeddingModel::TextEmbeddingAda002
        );

        let unknown = AiConfig {
            openai_api_key: "sk-test".to_string(),
            embedding_model: "text-embedding-unknown".to_string(),
        };
        assert!(unknown.embedding_model().is_err());
    }
}
