//! HTTP surface for the stock dashboard: an embedded single-page UI plus a
//! JSON API over the dashboard controller and in-memory sessions.

pub mod config;
pub mod dashboard_routes;
pub mod embedded_frontend;
pub mod request_id;
pub mod session_routes;
pub mod session_store;

#[cfg(test)]
#[path = "router_tests.rs"]
mod router_tests;

use anyhow::Context;
use axum::{
    extract::Request,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dashboard::DashboardController;
use market_data::{build_http_client, FmpClient, YahooChartClient};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::AppConfig;
pub use session_store::SessionStore;

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<DashboardController>,
    /// Live sessions; dropped on restart or when idle
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(controller: DashboardController, session_idle: Duration) -> Self {
        Self {
            controller: Arc::new(controller),
            sessions: Arc::new(SessionStore::new(session_idle)),
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = build_http_client(config.http_timeout).context("Failed to build HTTP client")?;
        let prices = YahooChartClient::new(client.clone(), config.yahoo_chart_url.as_str());
        let statements = FmpClient::new(client, config.fmp_base_url.as_str(), config.fmp_api_key.clone());
        Ok(Self::new(
            DashboardController::new(Arc::new(prices), Arc::new(statements)),
            config.session_idle,
        ))
    }
}

/// Periodically drop idle sessions.
fn spawn_session_cleanup(sessions: Arc<SessionStore>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            let evicted = sessions.cleanup();
            if evicted > 0 {
                tracing::debug!(evicted, active = sessions.len(), "idle sessions evicted");
            }
        }
    });
}

/// JSON envelope shared by every API response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error; anything convertible into `anyhow::Error` becomes a 500.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    pub fn bad_request(error: impl Into<anyhow::Error>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, error.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, anyhow::anyhow!(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = ?self.error, "request failed");
        } else {
            tracing::warn!(status = %self.status, error = %self.error, "request rejected");
        }
        (self.status, Json(ApiResponse::<()>::error(self.error.to_string()))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, err.into())
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<ApiResponse<Health>> {
    Json(ApiResponse::success(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(embedded_frontend::index))
        .route("/api/health", get(health))
        .merge(dashboard_routes::dashboard_routes())
        .merge(session_routes::session_routes())
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "api_server=info,dashboard=info,market_data=info,tower_http=info".into());

    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    if config.fmp_api_key.is_none() {
        tracing::warn!("FMP_API_KEY not set; financial ratios will show N/A");
    }

    let state = AppState::from_config(&config)?;
    spawn_session_cleanup(state.sessions.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("🚀 Stock dashboard listening on http://{}", config.bind_addr);
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
