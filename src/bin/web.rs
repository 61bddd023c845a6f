use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use monitor_web::{
    api::{ApiConfig, ApiState, serve_api},
    config::{Config, StorageConfig, load_config},
    storage::{AlertStore, MemoryBackend, sqlite::SqliteBackend},
};
use tracing::{debug, error, info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

const ENV_LOG_LEVEL: &str = "MONITOR_WEB_LOG_LEVEL";

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (JSON); defaults apply when omitted
    #[arg(short)]
    file: Option<String>,
}

fn init() {
    let level = std::env::var(ENV_LOG_LEVEL)
        .ok()
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO);

    let filter = filter::Targets::new().with_targets(vec![
        ("monitor_web", level),
        ("tower_http", level),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn AlertStore>> {
    match &config.storage {
        StorageConfig::Sqlite {
            path,
            max_connections,
        } => {
            let backend = SqliteBackend::connect(path, *max_connections)
                .await
                .with_context(|| format!("failed to open database at {}", path.display()))?;
            Ok(Arc::new(backend))
        }
        StorageConfig::None => {
            warn!("no storage configured, alerts are kept in memory only");
            Ok(Arc::new(MemoryBackend::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        return;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = load_config(args.file.as_deref())?;
    debug!("using config: {config:?}");

    let store = open_store(&config).await.inspect_err(|e| {
        error!("failed to initialize storage: {e:#}");
    })?;

    let state = ApiState::new(Arc::clone(&store));
    let result = serve_api(ApiConfig::from(&config), state, shutdown_signal()).await;

    store.close().await?;
    result
}
