//! Error handling for the volunteer signup core
//!
//! This module defines the main error types used throughout the crate
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the volunteer signup core
#[derive(Error, Debug)]
pub enum VolunteerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown form: {title}")]
    UnknownForm { title: String },

    #[error("Form '{form}' has no entry id for field '{field}'")]
    MissingEntryId { form: String, field: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("A submission is already in flight")]
    SubmissionInProgress,

    #[error("Form submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Form endpoint specific errors
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Form request failed: {0}")]
    RequestFailed(String),

    #[error("Form request timed out")]
    Timeout,

    #[error("Form endpoint rejected the submission with HTTP {status}")]
    Rejected { status: u16 },
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, VolunteerError>;

/// Result type alias for form transport operations
pub type SubmissionResult<T> = std::result::Result<T, SubmissionError>;

impl VolunteerError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            VolunteerError::Config(_) => false,
            VolunteerError::UnknownForm { .. } => false,
            VolunteerError::MissingEntryId { .. } => false,
            VolunteerError::InvalidStateTransition { .. } => false,
            VolunteerError::SubmissionInProgress => true,
            VolunteerError::Submission(_) => true,
            VolunteerError::Storage(_) => true,
            VolunteerError::Redis(_) => true,
            VolunteerError::Http(_) => true,
            VolunteerError::Serialization(_) => false,
            VolunteerError::Io(_) => true,
            VolunteerError::UrlParse(_) => false,
            VolunteerError::InvalidInput(_) => false,
        }
    }

    /// Configuration problems are fatal to a submit attempt and must reach
    /// the user as an alert rather than the failure screen.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            VolunteerError::Config(_)
                | VolunteerError::UnknownForm { .. }
                | VolunteerError::MissingEntryId { .. }
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VolunteerError::Config(_) => ErrorSeverity::Critical,
            VolunteerError::UnknownForm { .. } => ErrorSeverity::Critical,
            VolunteerError::MissingEntryId { .. } => ErrorSeverity::Critical,
            VolunteerError::SubmissionInProgress => ErrorSeverity::Info,
            VolunteerError::InvalidInput(_) => ErrorSeverity::Info,
            VolunteerError::Storage(_) | VolunteerError::Redis(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_critical() {
        let err = VolunteerError::UnknownForm { title: "Bake Sale".to_string() };
        assert!(err.is_configuration());
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.to_string(), "Unknown form: Bake Sale");
    }

    #[test]
    fn test_transport_errors_are_recoverable() {
        let err: VolunteerError = SubmissionError::Rejected { status: 500 }.into();
        assert!(err.is_recoverable());
        assert!(!err.is_configuration());
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_storage_errors_are_warnings() {
        let err = VolunteerError::Storage("disk full".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(format!("{}", err.severity()), "WARN");
    }
}
