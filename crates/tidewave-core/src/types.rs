//! Common types used across the Tidewave orchestrator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classified purpose of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Trigger the redeploy webhooks, then verify and heal.
    Deploy,
    /// Probe the health endpoint only.
    HealthCheck,
    /// Anything else goes to the LLM.
    Other,
}

impl Intent {
    /// Wire name of the intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Deploy => "deploy",
            Intent::HealthCheck => "health_check",
            Intent::Other => "other",
        }
    }

    /// One-line summary of the steps this intent will run.
    pub fn plan(&self) -> String {
        let steps = match self {
            Intent::Deploy => "implement -> verify -> (heal if fail)",
            Intent::HealthCheck => "verify",
            Intent::Other => "complete",
        };
        format!("intent={}; steps=[{}]", self.as_str(), steps)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The step of an orchestration that produced an [`ActionResult`](crate::ActionResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Initial redeploy.
    Implement,
    /// Health probe.
    Verify,
    /// Redeploy after a failed probe.
    Heal,
    /// LLM completion.
    Complete,
}

impl Step {
    /// Tag used in outcome log lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Step::Implement => "implement",
            Step::Verify => "verify",
            Step::Heal => "heal",
            Step::Complete => "complete",
        }
    }
}
