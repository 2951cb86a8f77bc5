//! Audit records sent to the remote log table.

use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;
use crate::outcome::OrchestrationOutcome;

/// Source tag written with every record.
pub const AUDIT_SOURCE: &str = "orchestrator/api";

/// Severity of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    Info,
    Warn,
    Error,
}

/// One row of the audit table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub source: String,
    pub level: AuditLevel,
    pub message: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

impl AuditEntry {
    pub fn new(level: AuditLevel, message: impl Into<String>, meta: serde_json::Value) -> Self {
        Self {
            source: AUDIT_SOURCE.to_string(),
            level,
            message: message.into(),
            meta,
        }
    }

    /// Summarize a finished orchestration of `instruction`.
    ///
    /// Failed verification or a failed action is recorded at `warn`. When
    /// every action that ran failed outright, the record is an `error`.
    pub fn orchestration(outcome: &OrchestrationOutcome, instruction: &Instruction) -> Self {
        let all_failed = !outcome.steps.is_empty()
            && outcome.steps.iter().all(|r| !r.success && !r.not_configured);
        let level = if outcome.succeeded() {
            AuditLevel::Info
        } else if all_failed {
            AuditLevel::Error
        } else {
            AuditLevel::Warn
        };

        let meta = serde_json::json!({
            "request_id": outcome.request_id,
            "intent": outcome.intent,
            "user": instruction.user(),
            "meta": instruction.meta(),
            "verify_passed": outcome.verify_passed,
            "retries": outcome.retries,
            "steps": outcome.steps,
        });

        Self::new(level, "orchestrate", meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ActionResult;
    use crate::types::{Intent, Step};

    #[test]
    fn test_orchestration_entry() {
        let mut builder = OrchestrationOutcome::builder(Intent::HealthCheck);
        builder.record(ActionResult::from_status(Step::Verify, 200));
        builder.verify_passed(true);
        let outcome = builder.build();

        let instruction = Instruction::new("is it alive")
            .unwrap()
            .with_user("alice")
            .with_meta(serde_json::json!({ "ticket": 42 }));
        let entry = AuditEntry::orchestration(&outcome, &instruction);
        assert_eq!(entry.source, AUDIT_SOURCE);
        assert_eq!(entry.level, AuditLevel::Info);
        assert_eq!(entry.message, "orchestrate");
        assert_eq!(entry.meta["intent"], "health_check");
        assert_eq!(entry.meta["user"], "alice");
        assert_eq!(entry.meta["retries"], 0);
        assert_eq!(entry.meta["meta"]["ticket"], 42);
    }

    #[test]
    fn test_failed_verification_is_warn() {
        let mut builder = OrchestrationOutcome::builder(Intent::HealthCheck);
        builder.record(ActionResult::from_status(Step::Verify, 503));
        builder.verify_passed(false);
        let outcome = builder.build();

        let entry = AuditEntry::orchestration(&outcome, &Instruction::new("status").unwrap());
        assert_eq!(entry.level, AuditLevel::Warn);
        assert!(entry.meta["user"].is_null());
        assert!(entry.meta["meta"].is_null());
    }

    #[test]
    fn test_every_step_failing_is_error() {
        let instruction = Instruction::new("redeploy").unwrap();

        let mut builder = OrchestrationOutcome::builder(Intent::Deploy);
        builder.record(ActionResult::failed(Step::Implement, "1 of 1 targets failed"));
        builder.record(ActionResult::from_status(Step::Verify, 503));
        builder.verify_passed(false);
        let entry = AuditEntry::orchestration(&builder.build(), &instruction);
        assert_eq!(entry.level, AuditLevel::Error);

        // A skipped integration is not an outright failure.
        let mut builder = OrchestrationOutcome::builder(Intent::Deploy);
        builder.record(ActionResult::not_configured(Step::Implement, "deploy hooks"));
        builder.record(ActionResult::from_status(Step::Verify, 503));
        builder.verify_passed(false);
        let entry = AuditEntry::orchestration(&builder.build(), &instruction);
        assert_eq!(entry.level, AuditLevel::Warn);
    }
}
