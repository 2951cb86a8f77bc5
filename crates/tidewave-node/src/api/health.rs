//! Health check endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Body of `/health` and `/ping`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: String,
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        app: state.config.app_name.clone(),
    })
}

/// Alias of `/health` for older monitors.
pub async fn ping(state: State<AppState>) -> Json<HealthResponse> {
    health_check(state).await
}
