//! # Tidewave Dispatch
//!
//! Routes a classified instruction to its actions and runs the bounded
//! verify-and-heal loop for deploys.

pub mod action;
pub mod dispatcher;
pub mod escalation;
pub mod heal;

#[cfg(test)]
mod testing;

pub use action::{AuditSink, Completion, Deployer, HealthProbe, NoopAuditSink};
pub use dispatcher::Dispatcher;
pub use escalation::EscalationPolicy;
pub use heal::{HealState, VerifyLoop, VerifyReport, MAX_HEAL_ATTEMPTS};
