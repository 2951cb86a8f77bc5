//! Request execution: dispatch plus audit logging.

use std::sync::Arc;

use tidewave_core::{AuditEntry, Instruction, OrchestrationOutcome};
use tidewave_dispatch::{AuditSink, Dispatcher};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Runs orchestrations and ships their audit records.
pub struct Engine {
    dispatcher: Dispatcher,
    audit: Arc<dyn AuditSink>,
}

impl Engine {
    /// Create a new engine.
    pub fn new(dispatcher: Dispatcher, audit: Arc<dyn AuditSink>) -> Self {
        Self { dispatcher, audit }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn audit_configured(&self) -> bool {
        self.audit.is_configured()
    }

    /// Run one instruction to completion.
    ///
    /// The audit record is written on a detached task; the response never
    /// waits for it.
    pub async fn orchestrate(&self, instruction: &Instruction) -> OrchestrationOutcome {
        let outcome = self.dispatcher.orchestrate(instruction).await;
        info!(
            "✅ {} finished: verify_passed={:?} retries={}",
            outcome.intent, outcome.verify_passed, outcome.retries
        );

        self.spawn_audit(AuditEntry::orchestration(&outcome, instruction));
        outcome
    }

    /// Write `entry` in the background. Failures are logged and dropped.
    pub fn spawn_audit(&self, entry: AuditEntry) -> JoinHandle<()> {
        let audit = self.audit.clone();
        tokio::spawn(async move {
            if let Err(err) = audit.record(entry).await {
                debug!(error = %err, "audit record dropped");
            }
        })
    }

    /// Write `entry` and wait for it. Returns true if the record was stored.
    pub async fn record(&self, entry: AuditEntry) -> bool {
        if !self.audit.is_configured() {
            return false;
        }
        match self.audit.record(entry).await {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "audit record failed");
                false
            }
        }
    }
}
