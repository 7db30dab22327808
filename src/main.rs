use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use apiscout::config::ServerConfig;
use apiscout::detector::{GitBranchEnsurer, RepositoryApiDetector};
use apiscout::server::{self, AppState};
use apiscout::storage::ContentCache;

#[derive(Debug, Parser)]
#[command(name = "apiscout-server", version, about = "API detection and content server for cloned repositories")]
struct Args {
    /// Path to a TOML config file
    #[arg(long, env = "APISCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the repositories directory
    #[arg(long, env = "APISCOUT_REPOS_DIR")]
    repos_dir: Option<PathBuf>,

    /// Override the listen port
    #[arg(long, env = "APISCOUT_PORT")]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("apiscout={default_level}"))),
        )
        .init();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(repos_dir) = args.repos_dir {
        config.repos_dir = repos_dir;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let cache = Arc::new(ContentCache::with_config(config.cache.clone().into()));
    let detector = Arc::new(RepositoryApiDetector::new(
        Arc::new(GitBranchEnsurer),
        config.branch_overrides.clone(),
    ));
    let state = AppState::new(cache, detector, config.repos_dir.clone());

    let app = server::router(state);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!(
        addr = %listener.local_addr().context("listener has no local address")?,
        repos_dir = %config.repos_dir.display(),
        "apiscout server listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
