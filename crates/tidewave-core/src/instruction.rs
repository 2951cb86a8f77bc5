//! The validated request an orchestration runs on.

use serde::Serialize;

use crate::error::{Result, TidewaveError};

/// A natural-language instruction. Immutable once built.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Instruction {
    text: String,
    user: Option<String>,
    critical: bool,
    meta: serde_json::Value,
}

impl Instruction {
    /// Build an instruction, trimming the text.
    ///
    /// Empty or whitespace-only text is rejected here so that nothing
    /// downstream ever sees it.
    pub fn new(text: impl AsRef<str>) -> Result<Self> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(TidewaveError::EmptyInstruction);
        }

        Ok(Self {
            text: text.to_string(),
            user: None,
            critical: false,
            meta: serde_json::Value::Null,
        })
    }

    /// Set the requesting user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Mark the instruction as critical.
    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Attach caller metadata.
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = meta;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn meta(&self) -> &serde_json::Value {
        &self.meta
    }

    /// Length of the text in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Always false; empty instructions cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
