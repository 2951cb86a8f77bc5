//! The verify-and-heal state machine.
//!
//! ```text
//! Verifying --pass--------------------------> Done
//! Verifying --fail, retries < budget--------> Healing --> Verifying
//! Verifying --fail, retries >= budget-------> Done (verify_passed = false)
//! ```
//!
//! The heal budget is [`MAX_HEAL_ATTEMPTS`] for deploys and zero for plain
//! health checks, so a request redeploys at most twice in total.

use std::time::Instant;

use tidewave_core::{OutcomeBuilder, Step};
use tracing::{info, warn};

use crate::action::{Deployer, HealthProbe};

/// Heal attempts allowed after the initial deploy.
pub const MAX_HEAL_ATTEMPTS: u32 = 1;

/// State of the verify loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealState {
    /// Probing the health endpoint.
    Verifying,
    /// Re-running the redeploy after a failed probe.
    Healing,
    /// Terminal.
    Done,
}

impl HealState {
    /// Transition out of `Verifying`.
    pub fn after_probe(passed: bool, retries: u32, heal_budget: u32) -> Self {
        if passed || retries >= heal_budget {
            HealState::Done
        } else {
            HealState::Healing
        }
    }
}

/// Terminal result of the verify loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyReport {
    /// Result of the last probe.
    pub verify_passed: bool,
    /// Heal attempts made.
    pub retries: u32,
}

/// Runs probes, healing through the deployer within a fixed budget.
pub struct VerifyLoop<'a> {
    probe: &'a dyn HealthProbe,
    deployer: Option<&'a dyn Deployer>,
    heal_budget: u32,
}

impl<'a> VerifyLoop<'a> {
    /// Probe once, never redeploy.
    pub fn verify_only(probe: &'a dyn HealthProbe) -> Self {
        Self {
            probe,
            deployer: None,
            heal_budget: 0,
        }
    }

    /// Probe, healing at most [`MAX_HEAL_ATTEMPTS`] times.
    pub fn with_heal(probe: &'a dyn HealthProbe, deployer: &'a dyn Deployer) -> Self {
        Self {
            probe,
            deployer: Some(deployer),
            heal_budget: MAX_HEAL_ATTEMPTS,
        }
    }

    /// Run to `Done`, recording every step into `outcome`.
    pub async fn run(&self, outcome: &mut OutcomeBuilder) -> VerifyReport {
        let mut state = HealState::Verifying;
        let mut passed = false;

        loop {
            state = match state {
                HealState::Verifying => {
                    let started = Instant::now();
                    let result = self.probe.probe().await;
                    let result = result
                        .with_step(Step::Verify)
                        .with_duration(started.elapsed().as_millis() as u64);

                    passed = result.success;
                    outcome.log(format!(
                        "[verify] GET {} -> {}",
                        self.probe.target(),
                        result.summary()
                    ));
                    outcome.push(result);
                    outcome.verify_passed(passed);

                    if !passed {
                        warn!(
                            url = self.probe.target(),
                            retries = outcome.retries(),
                            "health verification failed"
                        );
                    }
                    HealState::after_probe(passed, outcome.retries(), self.heal_budget)
                }
                HealState::Healing => match self.deployer {
                    Some(deployer) => {
                        let attempt = outcome.retry();
                        info!(attempt, "healing: redeploying");
                        outcome.log(format!("[heal] attempt={} -> redeploy", attempt));
                        crate::dispatcher::run_redeploy(deployer, Step::Heal, outcome).await;
                        HealState::Verifying
                    }
                    None => HealState::Done,
                },
                HealState::Done => break,
            };
        }

        VerifyReport {
            verify_passed: passed,
            retries: outcome.retries(),
        }
    }
}
