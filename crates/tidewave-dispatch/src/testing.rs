//! Scripted fakes of the action traits.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tidewave_core::{ActionResult, DeployReport, Step, TargetStatus};

use crate::action::{Completion, Deployer, HealthProbe};

/// Answers probes from a script of pass/fail values; 503 once exhausted.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<bool>>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(script: &[bool]) -> Self {
        Self {
            script: Mutex::new(script.iter().copied().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn probe(&self) -> ActionResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let passed = self.script.lock().unwrap().pop_front().unwrap_or(false);
        ActionResult::from_status(Step::Verify, if passed { 200 } else { 503 })
    }

    fn target(&self) -> &str {
        "http://probe.test/health"
    }
}

/// Counts redeploys. Reports two targets, configured or not.
pub struct CountingDeployer {
    configured: bool,
    calls: AtomicUsize,
}

impl CountingDeployer {
    pub fn new() -> Self {
        Self {
            configured: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Deployer for CountingDeployer {
    async fn redeploy(&self) -> DeployReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut report = DeployReport::new();
        for name in ["hook1", "hook2"] {
            let status = if self.configured {
                TargetStatus::Status { code: 201 }
            } else {
                TargetStatus::NotConfigured
            };
            report.insert(name, status);
        }
        report
    }
}

/// Records every completion request.
#[derive(Default)]
pub struct RecordingCompletion {
    calls: Mutex<Vec<(String, bool)>>,
}

impl RecordingCompletion {
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for RecordingCompletion {
    async fn complete(&self, prompt: &str, escalate: bool) -> ActionResult {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), escalate));
        ActionResult::from_status(Step::Complete, 200)
            .with_payload(serde_json::json!({ "escalated": escalate }))
    }
}
