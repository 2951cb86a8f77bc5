//! Error types for the Tidewave orchestrator.

use thiserror::Error;

/// Main error type for Tidewave operations.
#[derive(Error, Debug, Clone)]
pub enum TidewaveError {
    /// Instruction text was empty or whitespace only.
    #[error("text is required")]
    EmptyInstruction,

    /// An external integration has no credentials or URL configured.
    #[error("{integration} is not configured")]
    NotConfigured { integration: String },

    /// Outbound HTTP call failed or returned an unexpected status.
    #[error("HTTP error: {message}")]
    Http { status: Option<u16>, message: String },

    /// Outbound call timed out.
    #[error("Operation timed out after {duration_ms}ms: {message}")]
    Timeout { duration_ms: u64, message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Startup configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Internal error (should not happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TidewaveError {
    /// Returns true if this error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TidewaveError::EmptyInstruction)
    }

    /// Returns true if retrying the same call may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TidewaveError::Timeout { .. } => true,
            TidewaveError::Http { status, .. } => status.map_or(true, |s| s >= 500),
            _ => false,
        }
    }

    /// Build a not-configured error for the named integration.
    pub fn not_configured(integration: impl Into<String>) -> Self {
        TidewaveError::NotConfigured {
            integration: integration.into(),
        }
    }
}

/// Convenience Result type for Tidewave operations.
pub type Result<T> = std::result::Result<T, TidewaveError>;

impl From<serde_json::Error> for TidewaveError {
    fn from(err: serde_json::Error) -> Self {
        TidewaveError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(TidewaveError::EmptyInstruction.is_client_error());
        assert!(!TidewaveError::not_configured("anthropic").is_client_error());
        assert!(!TidewaveError::Internal("boom".into()).is_client_error());
    }

    #[test]
    fn test_recoverable() {
        let timeout = TidewaveError::Timeout {
            duration_ms: 10_000,
            message: "GET /health".into(),
        };
        assert!(timeout.is_recoverable());

        let bad_gateway = TidewaveError::Http {
            status: Some(502),
            message: "bad gateway".into(),
        };
        assert!(bad_gateway.is_recoverable());

        let not_found = TidewaveError::Http {
            status: Some(404),
            message: "not found".into(),
        };
        assert!(!not_found.is_recoverable());
        assert!(!TidewaveError::EmptyInstruction.is_recoverable());
    }

    #[test]
    fn test_not_configured_message() {
        let err = TidewaveError::not_configured("VERCEL_HOOK_1");
        assert_eq!(err.to_string(), "VERCEL_HOOK_1 is not configured");
    }
}
