//! nskv server binary.
//!
//! ```bash
//! nskv --config nskv.toml
//! NSKV_SIGNING_SECRET=... nskv --log-level debug
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use nskv::{
    AutosaveTask, CredentialStore, FilePersistence, KvService, Server, ServerConfig, ShardedStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Namespaced key-value server
#[derive(Parser, Debug)]
#[command(name = "nskv")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (missing file = defaults)
    #[arg(short, long, default_value = "nskv.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = ServerConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    info!(?config, "configuration loaded");

    let credentials = CredentialStore::from_file(&config.credentials_path)
        .context("credentials are required to start")?;
    info!(users = credentials.len(), "credentials loaded");

    let store = Arc::new(ShardedStore::new(config.shard_count));
    let persistence = Arc::new(FilePersistence::new(&config.snapshot_path));
    let restored = persistence.restore_into(&store).await;
    info!(
        entries = restored,
        shards = store.shard_count(),
        snapshot = %persistence.path().display(),
        "store ready"
    );

    let service = KvService::builder()
        .with_store(Arc::clone(&store))
        .with_credentials(credentials)
        .with_token_config(config.token_config())
        .with_config(config.service_config())
        .build()?;

    let autosave = AutosaveTask::spawn(
        Arc::clone(&store),
        Arc::clone(&persistence),
        config.snapshot_interval(),
    );

    let server = Server::bind(service, &config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    let shutdown = CancellationToken::new();
    let serving = tokio::spawn(server.serve(shutdown.clone()));

    if let Err(e) = wait_for_signal().await {
        warn!(error = %e, "signal listener failed, shutting down");
    }
    info!("shutdown requested");

    shutdown.cancel();
    let served = serving.await;
    autosave.shutdown().await;
    served.context("server task panicked")??;
    info!("bye");
    Ok(())
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = term.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
