//! # Tidewave HTTP
//!
//! reqwest-backed implementations of the dispatcher's actions, plus a client
//! for talking to a running orchestrator.
//!
//! Every integration shares one pooled [`reqwest::Client`] and applies its
//! own per-request timeout.

pub mod anthropic;
pub mod audit;
pub mod client;
pub mod probe;
pub mod webhook;

use std::time::Duration;

use tidewave_core::{ActionResult, Result, Step, TidewaveError};
use tracing::debug;

pub use anthropic::AnthropicClient;
pub use audit::SupabaseAuditSink;
pub use client::{OpsReport, OrchestrateResponse, ServiceStatus, TidewaveClient};
pub use probe::HttpHealthProbe;
pub use webhook::WebhookDeployer;

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::client::TidewaveClient;
    pub use tidewave_core::prelude::*;
}

/// Build the client shared by every integration.
pub fn shared_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("tidewave/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| TidewaveError::Internal(format!("failed to build HTTP client: {}", e)))
}

/// Map a transport failure onto the error taxonomy.
pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> TidewaveError {
    if err.is_timeout() {
        TidewaveError::Timeout {
            duration_ms: timeout.as_millis() as u64,
            message: err.to_string(),
        }
    } else {
        TidewaveError::Http {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// A failed result for a response whose body could not be read. The
/// status line was received, so it is kept.
pub(crate) fn body_read_failure(
    step: Step,
    status: u16,
    err: reqwest::Error,
    timeout: Duration,
) -> ActionResult {
    let err = transport_error(err, timeout);
    debug!(?step, status, error = %err, "response body could not be read");

    let mut result = ActionResult::from_error(step, &err);
    result.status = Some(status);
    result
}

/// Cut `text` to at most `max` characters.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
