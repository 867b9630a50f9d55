//! Unified error hierarchy for RestRS
//!
//! Provides a structured error type system covering model inference,
//! input validation, and configuration, with integration into the
//! tracing system.

use thiserror::Error;

/// Top-level error type for all RestRS operations
#[derive(Debug, Error)]
pub enum RestRsError {
    /// Model inference errors
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Model inference specific errors
///
/// Construction-time failures (the artifact cannot be loaded or is
/// semantically broken) are distinguished from per-call prediction
/// failures, but all of them surface to the end user as the same
/// generic message via [`RestRsError::user_message`].
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Model artifact could not be loaded or parsed
    #[error("Model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    /// Artifact parsed but its contents are unusable
    #[error("Invalid model artifact: {reason}")]
    InvalidArtifact { reason: String },

    /// Prediction failed for the given features
    #[error("Prediction failed: {reason}")]
    PredictionFailed { reason: String },
}

/// Result type alias for RestRS operations
pub type Result<T> = std::result::Result<T, RestRsError>;

impl RestRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RestRsError::Validation(_) => ErrorSeverity::Warning,
            RestRsError::Configuration(_) => ErrorSeverity::Warning,
            RestRsError::Inference(_) => ErrorSeverity::Error,
            RestRsError::Io(_) => ErrorSeverity::Error,
            RestRsError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            // All inference failures read the same to the end user; the
            // finer-grained variants exist for logs and diagnostics.
            RestRsError::Inference(_) => {
                "Sorry, there was a problem calculating your bedtime.".to_string()
            }
            RestRsError::Validation(reason) => {
                format!("Invalid input: {}", reason)
            }
            RestRsError::Configuration(reason) => {
                format!("Configuration problem: {}", reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
