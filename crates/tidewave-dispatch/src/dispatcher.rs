//! Intent dispatch.

use std::sync::Arc;
use std::time::Instant;

use tidewave_core::{classify, Instruction, Intent, OrchestrationOutcome, OutcomeBuilder, Step};
use tracing::{info, warn};

use crate::action::{Completion, Deployer, HealthProbe};
use crate::escalation::EscalationPolicy;
use crate::heal::VerifyLoop;

/// Routes instructions to their actions.
#[derive(Clone)]
pub struct Dispatcher {
    deployer: Arc<dyn Deployer>,
    probe: Arc<dyn HealthProbe>,
    llm: Arc<dyn Completion>,
    escalation: EscalationPolicy,
}

impl Dispatcher {
    /// Create a dispatcher over the given actions.
    pub fn new(
        deployer: Arc<dyn Deployer>,
        probe: Arc<dyn HealthProbe>,
        llm: Arc<dyn Completion>,
        escalation: EscalationPolicy,
    ) -> Self {
        Self {
            deployer,
            probe,
            llm,
            escalation,
        }
    }

    pub fn escalation(&self) -> &EscalationPolicy {
        &self.escalation
    }

    /// Classify the instruction, then dispatch it.
    pub async fn orchestrate(&self, instruction: &Instruction) -> OrchestrationOutcome {
        let intent = classify(instruction.text());
        self.dispatch(intent, instruction).await
    }

    /// Run the actions for `intent` and return the sealed outcome.
    pub async fn dispatch(&self, intent: Intent, instruction: &Instruction) -> OrchestrationOutcome {
        let mut outcome = OrchestrationOutcome::builder(intent);
        info!(%intent, user = ?instruction.user(), "dispatching instruction");

        match intent {
            Intent::Deploy => {
                run_redeploy(self.deployer.as_ref(), Step::Implement, &mut outcome).await;
                VerifyLoop::with_heal(self.probe.as_ref(), self.deployer.as_ref())
                    .run(&mut outcome)
                    .await;
            }
            Intent::HealthCheck => {
                VerifyLoop::verify_only(self.probe.as_ref())
                    .run(&mut outcome)
                    .await;
            }
            Intent::Other => {
                let escalate = self.escalation.should_escalate(instruction);
                let started = Instant::now();
                let result = self
                    .llm
                    .complete(instruction.text(), escalate)
                    .await
                    .with_step(Step::Complete)
                    .with_duration(elapsed_ms(started));

                if !result.success {
                    warn!(error = ?result.error, status = ?result.status, "completion failed");
                }
                outcome.log(format!("[complete] escalate={}", escalate));
                outcome.record(result);
            }
        }

        let outcome = outcome.build();
        info!(
            request_id = %outcome.request_id,
            %intent,
            verify_passed = ?outcome.verify_passed,
            retries = outcome.retries,
            action_ms = outcome.action_duration_ms(),
            "orchestration finished"
        );
        outcome
    }
}

/// Trigger one redeploy and record it as `step`.
pub(crate) async fn run_redeploy(deployer: &dyn Deployer, step: Step, outcome: &mut OutcomeBuilder) {
    let started = Instant::now();
    let report = deployer.redeploy().await;

    for line in report.summaries() {
        outcome.log(format!("[{}] {}", step.tag(), line));
    }
    if !report.succeeded() {
        warn!(step = step.tag(), targets = ?report.targets, "redeploy did not fully succeed");
    }

    let result = report.into_result(step).with_duration(elapsed_ms(started));
    outcome.push(result);
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
