#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;

use std::process;

use anyhow::Context;
use clap::Parser;
use savant_core::IntoProvider;
use savant_nats::NatsClient;
use savant_opendal::StorageBackend;
use savant_postgres::PgClient;
use savant_rig::provider::{Credentials, EmbeddingProvider};
use savant_worker::WorkerState;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "savant_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "savant_cli::shutdown";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "worker terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "worker terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing();
    log_startup_info();

    cli.validate()?;

    let state = connect_services(&cli).await?;

    let cancel_token = CancellationToken::new();
    let worker = state
        .ingest_worker(&cli.worker, cancel_token.clone())
        .await
        .context("failed to build ingest worker")?;
    let handle = worker.spawn();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        "interrupt received, shutting down"
    );
    cancel_token.cancel();

    handle
        .await
        .context("worker task panicked")?
        .context("worker loop failed")?;

    Ok(())
}

/// Connects all production services from configuration.
async fn connect_services(cli: &Cli) -> anyhow::Result<WorkerState> {
    let postgres =
        PgClient::new(cli.postgres.clone()).context("failed to create database client")?;

    let nats = NatsClient::connect(cli.nats.clone())
        .await
        .context("failed to connect to NATS")?;

    let storage = StorageBackend::new(cli.storage.clone())
        .await
        .context("failed to initialize storage backend")?;

    let embeddings = EmbeddingProvider::create(
        cli.ai.embedding_model()?,
        Credentials::new(cli.ai.openai_api_key.clone()),
    )
    .await
    .context("failed to connect embedding provider")?;

    Ok(WorkerState::new(postgres, nats, storage, embeddings))
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info() {
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting savant ingest worker"
    );

    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        "build information"
    );
}
