//! Stateless dashboard endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use dashboard::{ConfigUpdate, DashboardReport, SessionConfig, TimeFrame};
use serde::Serialize;

use crate::request_id::RequestId;
use crate::{ApiResponse, AppError, AppState};

#[derive(Debug, Serialize)]
pub struct TimeFrameInfo {
    pub label: &'static str,
    pub history_days: u32,
    pub interval: &'static str,
    pub default: bool,
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/api/timeframes", get(list_timeframes))
        .route("/api/dashboard", post(render_dashboard))
}

async fn list_timeframes() -> Json<ApiResponse<Vec<TimeFrameInfo>>> {
    let default = TimeFrame::default();
    let frames = TimeFrame::ALL
        .iter()
        .map(|tf| TimeFrameInfo {
            label: tf.label(),
            history_days: tf.history_days(),
            interval: tf.interval().as_str(),
            default: *tf == default,
        })
        .collect();
    Json(ApiResponse::success(frames))
}

/// One-off submission: the body is applied over the default configuration.
async fn render_dashboard(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<ApiResponse<DashboardReport>>, AppError> {
    let config = SessionConfig::from_update(update).map_err(AppError::bad_request)?;
    tracing::info!(%request_id, ticker = %config.ticker, "stateless dashboard request");

    let report = state.controller.submit(&config).await;
    Ok(Json(ApiResponse::success(report)))
}
