//! Model escalation for LLM completions.

use tidewave_core::{Instruction, LlmConfig};

/// Decides when an instruction goes to the larger model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    /// Instructions longer than this many characters escalate.
    pub threshold: usize,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default())
    }
}

impl EscalationPolicy {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.promotion_threshold)
    }

    /// Critical instructions always escalate; others only when long.
    pub fn should_escalate(&self, instruction: &Instruction) -> bool {
        instruction.is_critical() || instruction.len() > self.threshold
    }
}
