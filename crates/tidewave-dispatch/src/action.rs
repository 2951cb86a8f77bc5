//! Traits for the external side effects the dispatcher drives.
//!
//! Implementations never return errors for downstream failures: a failed,
//! timed-out or unconfigured call is reported inside the returned result.

use async_trait::async_trait;
use tidewave_core::{ActionResult, AuditEntry, DeployReport, Result};

/// Triggers the redeploy webhooks.
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Call every configured target once and report per-target status.
    /// Empty slots are reported as not configured.
    async fn redeploy(&self) -> DeployReport;
}

/// Probes the deployed service's health endpoint.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// GET the endpoint. Success is a 2xx status.
    async fn probe(&self) -> ActionResult;

    /// The URL being probed, for log lines.
    fn target(&self) -> &str;
}

/// Asks an LLM to complete a prompt.
#[async_trait]
pub trait Completion: Send + Sync {
    /// `escalate` selects the larger model.
    async fn complete(&self, prompt: &str, escalate: bool) -> ActionResult;
}

/// Receives audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Store one record. Callers treat errors as non-fatal.
    async fn record(&self, entry: AuditEntry) -> Result<()>;

    /// Returns true if records actually leave the process.
    fn is_configured(&self) -> bool;
}

/// Audit sink that drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn record(&self, _entry: AuditEntry) -> Result<()> {
        Ok(())
    }

    fn is_configured(&self) -> bool {
        false
    }
}
