//! HTTP API for alert ingestion and module dashboards
//!
//! ## Architecture
//!
//! - **Axum** web framework with Tower middleware
//! - **Shared state** holding the dispatcher and the storage handle
//! - **JSON** everywhere; dashboard data comes in a Chart.js-ready shape
//!
//! ## Endpoints
//!
//! - `POST /api/alerts` - Ingest one alert event
//! - `GET /dashboard/:module` - Latest alerts and daily counts of a module
//! - `GET /api/alerts/:module` - Same as the dashboard endpoint
//! - `GET /api/health` - Health check
//! - `GET /api/stats` - Alert counts per collection
//! - `GET /static/*` - Static assets, when the directory exists

#[cfg(feature = "api")]
pub mod error;
#[cfg(feature = "api")]
pub mod routes;
#[cfg(feature = "api")]
pub mod state;
#[cfg(feature = "api")]
pub mod types;

#[cfg(feature = "api")]
pub use error::{ApiError, ApiResult};
#[cfg(feature = "api")]
pub use state::ApiState;
#[cfg(feature = "api")]
pub use types::{ChartData, DashboardResponse, HealthResponse, StatsResponse, StoreResponse};

#[cfg(feature = "api")]
use axum::{
    Router,
    routing::{get, post},
};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
#[cfg(feature = "api")]
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:8080")
    pub bind_addr: SocketAddr,

    /// Enable CORS for the dashboard
    pub enable_cors: bool,

    /// Directory served under `/static`
    pub static_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            enable_cors: true,
            static_dir: None,
        }
    }
}

impl From<&crate::config::Config> for ApiConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            bind_addr: config.bind_addr(),
            enable_cors: config.enable_cors,
            static_dir: Some(config.static_dir.clone()),
        }
    }
}

/// Build the application router
#[cfg(feature = "api")]
pub fn router(config: &ApiConfig, state: ApiState) -> Router {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let mut app = Router::new()
        .route("/api/alerts", post(routes::alerts::receive_alert))
        .route("/api/alerts/:module", get(routes::dashboard::show_dashboard))
        .route("/dashboard/:module", get(routes::dashboard::show_dashboard))
        .route("/api/health", get(routes::health::health_check))
        .route("/api/stats", get(routes::stats::get_stats))
        .with_state(state);

    if let Some(dir) = config.static_dir.as_ref().filter(|d| d.is_dir()) {
        use tower_http::services::ServeDir;

        info!("serving static files from {}", dir.display());
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app = app.layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task.
/// Returns the server's local address.
#[cfg(feature = "api")]
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);

    let app = router(&config, state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(addr)
}

/// Run the API server until `shutdown` resolves
#[cfg(feature = "api")]
pub async fn serve_api(
    config: ApiConfig,
    state: ApiState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = router(&config, state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("API server stopped");
    Ok(())
}
