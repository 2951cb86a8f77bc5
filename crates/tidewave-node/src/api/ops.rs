//! Operational summary.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OpsResponse {
    pub ok: bool,
    pub budgets: BudgetsView,
    pub integrations: IntegrationsView,
}

#[derive(Debug, Serialize)]
pub struct BudgetsView {
    pub daily_token_budget: u64,
    pub monthly_token_budget: u64,
    pub promotion_threshold: usize,
    pub max_tokens_per_call: u32,
}

/// Which integrations have credentials or URLs.
#[derive(Debug, Serialize)]
pub struct IntegrationsView {
    pub supabase: bool,
    pub anthropic: bool,
    pub vercel_hooks: bool,
    pub health_probe: bool,
}

/// Report budgets and configured integrations. Never exposes secrets.
pub async fn ops(State(state): State<AppState>) -> Json<OpsResponse> {
    let config = &state.config;

    Json(OpsResponse {
        ok: true,
        budgets: BudgetsView {
            daily_token_budget: config.budgets.daily_tokens,
            monthly_token_budget: config.budgets.monthly_tokens,
            promotion_threshold: state.engine.dispatcher().escalation().threshold,
            max_tokens_per_call: config.llm.max_tokens,
        },
        integrations: IntegrationsView {
            supabase: state.engine.audit_configured(),
            anthropic: config.llm.is_configured(),
            vercel_hooks: config.deploy.is_configured(),
            health_probe: config.health.is_configured(),
        },
    })
}
