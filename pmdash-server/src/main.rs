//! pmdash-server - project management dashboard service
//!
//! Serves the record store over HTTP and drives KPI classification through
//! the external classifier.

use anyhow::{Context, Result};
use clap::Parser;
use pmdash_common::config::{locate_config, ConfigOverrides, TomlConfig};
use pmdash_common::db::init_database;
use pmdash_server::kpi::{HttpClassifier, KpiOrchestrator, SqliteKpiStore};
use pmdash_server::{build_router, cors_layer, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments. Each overrides the matching config file value.
#[derive(Debug, Parser)]
#[command(name = "pmdash-server", version, about = "Project management dashboard service")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the SQLite database
    #[arg(short, long, env = "PMDASH_DATABASE")]
    database: Option<PathBuf>,

    /// HTTP port to listen on
    #[arg(short, long, env = "PMDASH_PORT")]
    port: Option<u16>,

    /// Classifier endpoint URL
    #[arg(long, env = "PMDASH_CLASSIFIER_URL")]
    classifier_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Read before tracing is up so the configured level can seed the filter.
    // The loader itself does not log; the outcome is reported below.
    let config_path = locate_config(cli.config.as_deref());
    let config = TomlConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting pmdash-server v{}", env!("CARGO_PKG_VERSION"));
    match config_path {
        Some(path) if path.exists() => info!("Configuration: {}", path.display()),
        _ => warn!("No configuration file found, using built-in defaults"),
    }

    let config = config
        .apply_overrides(ConfigOverrides {
            database_path: cli.database,
            port: cli.port,
            classifier_endpoint: cli.classifier_url,
        })
        .context("Invalid command-line override")?;

    let db_path = config.resolved_database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let classifier = HttpClassifier::new(&config.classifier)?;
    let max_wait = Duration::from_millis(config.classifier.effective_max_wait_ms());
    info!(
        endpoint = %classifier.endpoint(),
        max_wait_ms = max_wait.as_millis() as u64,
        "KPI classifier configured"
    );

    let orchestrator = KpiOrchestrator::new(
        Arc::new(SqliteKpiStore::new(pool.clone())),
        Arc::new(classifier),
        max_wait,
    );

    let state = AppState::new(pool, Arc::new(orchestrator));
    let app = build_router(state).layer(cors_layer(&config.cors_origins));

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("pmdash-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
