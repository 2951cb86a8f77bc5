//! Action results and the per-request orchestration outcome.
//!
//! An [`OrchestrationOutcome`] is built incrementally through an
//! [`OutcomeBuilder`] while a request runs and is immutable once returned.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TidewaveError;
use crate::types::{Intent, Step};

/// Outcome of one action invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionResult {
    /// The step that produced this result.
    pub step: Step,

    /// Whether the action did what it was asked to.
    pub success: bool,

    /// HTTP status of the downstream call, if one completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Error message if the action failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Opaque action output (LLM body, per-target map, health body).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,

    /// The integration behind this action has no URL or credentials.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not_configured: bool,

    /// Wall-clock duration of the action in milliseconds.
    #[serde(default)]
    pub duration_ms: u64,
}

impl ActionResult {
    /// A result for a downstream call that returned `status`.
    /// Success is any 2xx status.
    pub fn from_status(step: Step, status: u16) -> Self {
        Self {
            step,
            success: (200..300).contains(&status),
            status: Some(status),
            error: None,
            payload: None,
            not_configured: false,
            duration_ms: 0,
        }
    }

    /// A failed result with an error message.
    pub fn failed(step: Step, error: impl Into<String>) -> Self {
        Self {
            step,
            success: false,
            status: None,
            error: Some(error.into()),
            payload: None,
            not_configured: false,
            duration_ms: 0,
        }
    }

    /// A failed result built from an error.
    pub fn from_error(step: Step, error: &TidewaveError) -> Self {
        let mut result = Self::failed(step, error.to_string());
        match error {
            TidewaveError::Http { status, .. } => result.status = *status,
            TidewaveError::NotConfigured { .. } => result.not_configured = true,
            _ => {}
        }
        result
    }

    /// An explicit "not configured" result for a missing integration.
    pub fn not_configured(step: Step, integration: impl Into<String>) -> Self {
        Self::from_error(step, &TidewaveError::not_configured(integration))
    }

    /// Override the success flag (e.g. LLM calls accept only 200/201).
    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attach the action duration.
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Re-tag the result with another step.
    pub fn with_step(mut self, step: Step) -> Self {
        self.step = step;
        self
    }

    /// Short description used in outcome log lines.
    pub fn summary(&self) -> String {
        match (&self.status, &self.error) {
            (_, Some(error)) if self.not_configured => format!("skipped: {}", error),
            (Some(status), _) => format!("status={}", status),
            (None, Some(error)) => format!("error={}", error),
            (None, None) if self.success => "ok".to_string(),
            (None, None) => "failed".to_string(),
        }
    }
}

/// Result of calling one redeploy target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TargetStatus {
    /// The target answered with an HTTP status.
    Status { code: u16 },
    /// The call failed before a status was received.
    Error { message: String },
    /// No URL is configured for this target slot.
    NotConfigured,
}

impl TargetStatus {
    /// Returns true for a 2xx answer.
    pub fn is_success(&self) -> bool {
        matches!(self, TargetStatus::Status { code } if (200..300).contains(code))
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, TargetStatus::NotConfigured)
    }

    fn summary(&self) -> String {
        match self {
            TargetStatus::Status { code } => format!("status={}", code),
            TargetStatus::Error { message } => format!("error={}", message),
            TargetStatus::NotConfigured => "not_configured".to_string(),
        }
    }
}

/// Per-target results of one redeploy fan-out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployReport {
    /// Target name to status. Targets have no ordering dependency.
    pub targets: BTreeMap<String, TargetStatus>,
}

impl DeployReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the status of one target.
    pub fn insert(&mut self, target: impl Into<String>, status: TargetStatus) {
        self.targets.insert(target.into(), status);
    }

    /// Returns true if at least one target has a URL.
    pub fn is_configured(&self) -> bool {
        self.targets.values().any(TargetStatus::is_configured)
    }

    /// Returns true if every configured target answered 2xx and at least
    /// one target is configured.
    pub fn succeeded(&self) -> bool {
        self.is_configured()
            && self
                .targets
                .values()
                .filter(|s| s.is_configured())
                .all(TargetStatus::is_success)
    }

    /// One log fragment per target, in target-name order.
    pub fn summaries(&self) -> Vec<String> {
        self.targets
            .iter()
            .map(|(name, status)| format!("{} {}", name, status.summary()))
            .collect()
    }

    /// Convert into the action result for an implement or heal step.
    pub fn into_result(self, step: Step) -> ActionResult {
        let configured = self.targets.values().filter(|s| s.is_configured()).count();
        let failed = self
            .targets
            .values()
            .filter(|s| s.is_configured() && !s.is_success())
            .count();

        let mut result = if configured == 0 {
            ActionResult::not_configured(step, "redeploy webhook")
        } else if failed > 0 {
            ActionResult::failed(step, format!("{} of {} targets failed", failed, configured))
        } else {
            ActionResult {
                step,
                success: true,
                status: None,
                error: None,
                payload: None,
                not_configured: false,
                duration_ms: 0,
            }
        };

        // BTreeMap<String, _> with plain enum values always serializes.
        result.payload = serde_json::to_value(&self.targets).ok();
        result
    }
}

/// Aggregate result of one orchestration request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrchestrationOutcome {
    /// Unique identifier for this request.
    pub request_id: Uuid,

    /// The classified intent.
    pub intent: Intent,

    /// One-line description of the planned steps.
    pub plan: String,

    /// Results in the order the actions ran.
    pub steps: Vec<ActionResult>,

    /// Final health verification result. `None` when no probe ran.
    pub verify_passed: Option<bool>,

    /// Number of heal attempts.
    pub retries: u32,

    /// Human-readable trace of the run.
    pub logs: Vec<String>,

    /// When the request started.
    pub started_at: DateTime<Utc>,

    /// When the outcome was sealed.
    pub finished_at: DateTime<Utc>,
}

impl OrchestrationOutcome {
    /// Create a builder for the given intent.
    pub fn builder(intent: Intent) -> OutcomeBuilder {
        OutcomeBuilder::new(intent)
    }

    /// Number of results produced by the given step.
    pub fn count(&self, step: Step) -> usize {
        self.steps.iter().filter(|r| r.step == step).count()
    }

    /// Number of redeploy invocations (initial plus heals).
    pub fn redeploys(&self) -> usize {
        self.count(Step::Implement) + self.count(Step::Heal)
    }

    /// Returns true if the request achieved what its intent asked for.
    pub fn succeeded(&self) -> bool {
        match self.verify_passed {
            Some(passed) => passed,
            None => self.steps.iter().all(|r| r.success),
        }
    }

    /// Total duration of all actions in milliseconds.
    pub fn action_duration_ms(&self) -> u64 {
        self.steps.iter().map(|r| r.duration_ms).sum()
    }
}

/// Incrementally builds an [`OrchestrationOutcome`].
#[derive(Debug)]
pub struct OutcomeBuilder {
    request_id: Uuid,
    intent: Intent,
    steps: Vec<ActionResult>,
    verify_passed: Option<bool>,
    retries: u32,
    logs: Vec<String>,
    started_at: DateTime<Utc>,
}

impl OutcomeBuilder {
    /// Start an outcome. The plan line is logged first.
    pub fn new(intent: Intent) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            intent,
            steps: Vec::new(),
            verify_passed: None,
            retries: 0,
            logs: vec![format!("[plan] {}", intent.plan())],
            started_at: Utc::now(),
        }
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Append an action result and its log line.
    pub fn record(&mut self, result: ActionResult) {
        self.logs
            .push(format!("[{}] {}", result.step.tag(), result.summary()));
        self.steps.push(result);
    }

    /// Append an action result without a log line.
    pub fn push(&mut self, result: ActionResult) {
        self.steps.push(result);
    }

    /// Append a free-form log line.
    pub fn log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }

    /// Record the latest verification result.
    pub fn verify_passed(&mut self, passed: bool) {
        self.verify_passed = Some(passed);
    }

    /// Count a heal attempt and return the new total.
    pub fn retry(&mut self) -> u32 {
        self.retries += 1;
        self.retries
    }

    /// Seal the outcome.
    pub fn build(self) -> OrchestrationOutcome {
        OrchestrationOutcome {
            request_id: self.request_id,
            intent: self.intent,
            plan: self.intent.plan(),
            steps: self.steps,
            verify_passed: self.verify_passed,
            retries: self.retries,
            logs: self.logs,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_success_range() {
        assert!(ActionResult::from_status(Step::Verify, 200).success);
        assert!(ActionResult::from_status(Step::Verify, 204).success);
        assert!(!ActionResult::from_status(Step::Verify, 503).success);
        assert!(!ActionResult::from_status(Step::Verify, 301).success);
    }

    #[test]
    fn test_not_configured_result() {
        let result = ActionResult::not_configured(Step::Complete, "anthropic");
        assert!(!result.success);
        assert!(result.not_configured);
        assert_eq!(result.error.as_deref(), Some("anthropic is not configured"));
        assert_eq!(result.summary(), "skipped: anthropic is not configured");
    }

    #[test]
    fn test_from_http_error_keeps_status() {
        let err = TidewaveError::Http {
            status: Some(502),
            message: "bad gateway".into(),
        };
        let result = ActionResult::from_error(Step::Verify, &err);
        assert_eq!(result.status, Some(502));
        assert!(!result.not_configured);
        assert_eq!(result.summary(), "status=502");
    }

    #[test]
    fn test_deploy_report_all_unconfigured() {
        let mut report = DeployReport::new();
        report.insert("hook1", TargetStatus::NotConfigured);
        report.insert("hook2", TargetStatus::NotConfigured);

        assert!(!report.is_configured());
        assert!(!report.succeeded());

        let result = report.into_result(Step::Implement);
        assert!(result.not_configured);
        assert!(!result.success);
        let payload = result.payload.unwrap();
        assert_eq!(payload["hook1"]["outcome"], "not_configured");
        assert_eq!(payload["hook2"]["outcome"], "not_configured");
    }

    #[test]
    fn test_deploy_report_partial_failure() {
        let mut report = DeployReport::new();
        report.insert("hook1", TargetStatus::Status { code: 201 });
        report.insert(
            "hook2",
            TargetStatus::Error {
                message: "connection refused".into(),
            },
        );

        assert!(report.is_configured());
        assert!(!report.succeeded());
        assert_eq!(
            report.summaries(),
            vec!["hook1 status=201", "hook2 error=connection refused"]
        );

        let result = report.into_result(Step::Heal);
        assert_eq!(result.step, Step::Heal);
        assert_eq!(result.error.as_deref(), Some("1 of 2 targets failed"));
    }

    #[test]
    fn test_deploy_report_ignores_unconfigured_slots() {
        let mut report = DeployReport::new();
        report.insert("hook1", TargetStatus::Status { code: 200 });
        report.insert("hook2", TargetStatus::NotConfigured);

        assert!(report.succeeded());
        let result = report.into_result(Step::Implement);
        assert!(result.success);
        assert_eq!(result.payload.unwrap()["hook1"]["code"], 200);
    }

    #[test]
    fn test_builder_records_in_order() {
        let mut builder = OrchestrationOutcome::builder(Intent::Deploy);
        builder.record(ActionResult::from_status(Step::Implement, 200));
        builder.record(ActionResult::from_status(Step::Verify, 500));
        builder.verify_passed(false);
        assert_eq!(builder.retry(), 1);
        builder.log("[heal] attempt=1 -> redeploy");
        builder.record(ActionResult::from_status(Step::Heal, 200));
        builder.record(ActionResult::from_status(Step::Verify, 200));
        builder.verify_passed(true);

        let outcome = builder.build();
        assert_eq!(outcome.retries, 1);
        assert_eq!(outcome.verify_passed, Some(true));
        assert_eq!(outcome.redeploys(), 2);
        assert_eq!(outcome.count(Step::Verify), 2);
        assert!(outcome.succeeded());
        assert_eq!(
            outcome.logs,
            vec![
                "[plan] intent=deploy; steps=[implement -> verify -> (heal if fail)]",
                "[implement] status=200",
                "[verify] status=500",
                "[heal] attempt=1 -> redeploy",
                "[heal] status=200",
                "[verify] status=200",
            ]
        );
        assert!(outcome.finished_at >= outcome.started_at);
    }

    #[test]
    fn test_outcome_without_probe() {
        let mut builder = OrchestrationOutcome::builder(Intent::Other);
        builder.record(ActionResult::failed(Step::Complete, "timed out"));
        let outcome = builder.build();

        assert_eq!(outcome.verify_passed, None);
        assert!(!outcome.succeeded());
        assert_eq!(outcome.logs[1], "[complete] error=timed out");
    }
}
