//! Error Types for the Risk Engine

use thiserror::Error;

/// Result type alias for risk operations
pub type Result<T> = std::result::Result<T, RiskError>;

/// Risk engine error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// Caller-supplied data violates a precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected failure while deriving metrics or scores
    #[error("Computation failure: {0}")]
    ComputationFailure(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RiskError {
    /// Whether the caller is at fault (maps to a 4xx response)
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Convert to a caller-safe message
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::ComputationFailure(_) => "Risk computation failed.".into(),
            Self::Config(_) => "Service configuration error.".into(),
        }
    }

    /// Short machine-readable tag
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ComputationFailure(_) => "computation_failure",
            Self::Config(_) => "configuration_error",
        }
    }
}
