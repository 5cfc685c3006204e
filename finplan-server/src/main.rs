//! finplan-server - financial planning questionnaire and analysis service
//!
//! Stores questionnaires, decides plan tier and report section access, and
//! forwards normalized analysis requests to an external analysis endpoint.

use anyhow::{Context, Result};
use clap::Parser;
use finplan_common::config::{database_path, default_config_path, RootFolderResolver, TomlConfig};
use finplan_common::db::init_database;
use finplan_server::analysis_client::HttpAnalysisProvider;
use finplan_server::rate_limit::AnalysisRateLimiter;
use finplan_server::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "finplan-server")]
#[command(about = "Financial planning questionnaire and analysis service")]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "FINPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "FINPLAN_PORT")]
    port: Option<u16>,

    /// Root folder holding the database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Explicit database file (overrides root folder)
    #[arg(long, env = "FINPLAN_DATABASE")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let config = TomlConfig::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting finplan-server v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let root_folder = RootFolderResolver::new(args.root_folder.clone(), &config).resolve();
    let db_path = args
        .database
        .clone()
        .unwrap_or_else(|| database_path(&config, &root_folder));
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    info!("Database ready");

    let provider = HttpAnalysisProvider::new(
        config.analysis.endpoint.clone(),
        config.analysis_api_key(),
        Duration::from_secs(config.analysis.timeout_secs),
    )?;
    info!("Analysis endpoint: {}", provider.endpoint());

    let limiter = AnalysisRateLimiter::per_minute(config.analysis.requests_per_minute);
    let state = AppState::new(pool, Arc::new(provider), limiter);
    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("finplan-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
