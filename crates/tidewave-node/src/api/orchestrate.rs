//! The orchestration endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tidewave_core::{ActionResult, Instruction, Intent, OrchestrationOutcome, Result};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request to run an instruction.
#[derive(Debug, Default, Deserialize)]
pub struct OrchestrateRequest {
    /// Instruction text.
    #[serde(default)]
    pub text: Option<String>,

    /// Alternate key for the instruction text. `text` wins when both are set.
    #[serde(default)]
    pub prompt: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    /// Forces the escalated model for LLM instructions.
    #[serde(default)]
    pub critical: Option<bool>,

    #[serde(default)]
    pub meta: Option<Value>,
}

impl OrchestrateRequest {
    /// Validate into an instruction. Empty text is rejected.
    pub fn into_instruction(self) -> Result<Instruction> {
        let mut instruction = Instruction::new(self.text.or(self.prompt).unwrap_or_default())?
            .critical(self.critical.unwrap_or(false));
        if let Some(user) = self.user {
            instruction = instruction.with_user(user);
        }
        if let Some(meta) = self.meta {
            instruction = instruction.with_meta(meta);
        }
        Ok(instruction)
    }
}

/// Response for a finished orchestration.
#[derive(Debug, Serialize)]
pub struct OrchestrateResponse {
    pub ok: bool,
    pub request_id: Uuid,
    pub intent: Intent,
    pub plan: String,
    pub steps: Vec<ActionResult>,
    pub verify_passed: Option<bool>,
    pub retries: u32,
    pub logs: Vec<String>,
}

impl From<OrchestrationOutcome> for OrchestrateResponse {
    fn from(outcome: OrchestrationOutcome) -> Self {
        Self {
            ok: true,
            request_id: outcome.request_id,
            intent: outcome.intent,
            plan: outcome.plan,
            steps: outcome.steps,
            verify_passed: outcome.verify_passed,
            retries: outcome.retries,
            logs: outcome.logs,
        }
    }
}

/// Classify, run and report one instruction.
pub async fn orchestrate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrchestrateRequest>, JsonRejection>,
) -> std::result::Result<Json<OrchestrateResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let instruction = req.into_instruction()?;

    info!("📥 Orchestrating {} chars for {:?}", instruction.len(), instruction.user());
    let outcome = state.engine.orchestrate(&instruction).await;

    Ok(Json(outcome.into()))
}
