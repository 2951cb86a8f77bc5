//! Free-form audit logging.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tidewave_core::{AuditEntry, AuditLevel};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MvpResponse {
    pub ok: bool,
    /// True if the record reached the audit table.
    pub logged: bool,
    pub echo: Value,
}

/// Record an arbitrary JSON payload and echo it back.
pub async fn mvp_log(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MvpResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let entry = AuditEntry::new(AuditLevel::Info, "mvp_log", payload.clone());
    let logged = state.engine.record(entry).await;

    Ok(Json(MvpResponse {
        ok: true,
        logged,
        echo: payload,
    }))
}
