//! # Tidewave Core
//!
//! Core primitives and types for the Tidewave orchestrator.
//!
//! This crate provides the fundamental building blocks:
//! - [`Instruction`] - Validated natural-language request
//! - [`Intent`] - Classified purpose of an instruction
//! - [`ActionResult`] - Outcome of one external side effect
//! - [`OrchestrationOutcome`] - Aggregate result of one request
//! - [`Config`] - Startup configuration shared by every component
//! - [`TidewaveError`] - Error types

pub mod audit;
pub mod classify;
pub mod config;
pub mod error;
pub mod instruction;
pub mod outcome;
pub mod types;

// Re-exports for convenience
pub use audit::{AuditEntry, AuditLevel};
pub use classify::classify;
pub use config::{AuditConfig, Budgets, Config, DeployConfig, HealthConfig, LlmConfig, WebhookTarget};
pub use error::{Result, TidewaveError};
pub use instruction::Instruction;
pub use outcome::{ActionResult, DeployReport, OrchestrationOutcome, OutcomeBuilder, TargetStatus};
pub use types::*;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::classify::classify;
    pub use crate::config::Config;
    pub use crate::error::{Result, TidewaveError};
    pub use crate::instruction::Instruction;
    pub use crate::outcome::{ActionResult, DeployReport, OrchestrationOutcome, TargetStatus};
    pub use crate::types::{Intent, Step};
}
