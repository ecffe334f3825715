//! Session endpoints
//!
//! A session holds a `SessionConfig` so the UI can change indicators or the
//! time frame and re-render without sending the ticker again. Sessions live
//! in memory only.

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use dashboard::{ConfigUpdate, DashboardReport, SessionConfig};
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiResponse, AppError, AppState};

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub config: SessionConfig,
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/:id",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/api/sessions/:id/submit", post(submit_session))
}

fn unknown_session(id: Uuid) -> AppError {
    AppError::not_found(format!("Session {} not found", id))
}

async fn create_session(State(state): State<AppState>) -> Json<ApiResponse<SessionView>> {
    let (id, config) = state.sessions.create();
    tracing::info!(session = %id, active = state.sessions.len(), "session started");

    Json(ApiResponse::success(SessionView { id, config }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let config = state.sessions.get(&id).ok_or_else(|| unknown_session(id))?;

    Ok(Json(ApiResponse::success(SessionView { id, config })))
}

fn apply_update(state: &AppState, id: Uuid, update: ConfigUpdate) -> Result<SessionConfig, AppError> {
    state
        .sessions
        .update(&id, update)
        .ok_or_else(|| unknown_session(id))?
        .map_err(AppError::bad_request)
}

async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let config = apply_update(&state, id, update)?;
    tracing::debug!(session = %id, ticker = %config.ticker, "session updated");

    Ok(Json(ApiResponse::success(SessionView { id, config })))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let config = state.sessions.remove(&id).ok_or_else(|| unknown_session(id))?;
    tracing::info!(session = %id, "session ended");

    Ok(Json(ApiResponse::success(SessionView { id, config })))
}

/// An empty body re-renders as-is; anything else must be a valid `ConfigUpdate`.
fn parse_optional_update(body: &[u8]) -> Result<Option<ConfigUpdate>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid config update: {}", e)))
}

/// Optionally apply an update, then render with the session's configuration.
async fn submit_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<DashboardReport>>, AppError> {
    let config = match parse_optional_update(&body)? {
        Some(update) => apply_update(&state, id, update)?,
        None => state.sessions.get(&id).ok_or_else(|| unknown_session(id))?,
    };

    let report = state.controller.submit(&config).await;
    Ok(Json(ApiResponse::success(report)))
}
