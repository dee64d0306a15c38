//! Error types for spendboard-core
//!
//! Validation failures are reported before any state is touched; the
//! caller shows the message inline and keeps its current view.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Form input rejected
    ValidationError,
    /// Start date after end date
    InvalidDateRange,
    /// Category name already taken
    DuplicateEntry,
    /// CSV writing failed
    ExportError,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InvalidDateRange => write!(f, "INVALID_DATE_RANGE"),
            ErrorCode::DuplicateEntry => write!(f, "DUPLICATE_ENTRY"),
            ErrorCode::ExportError => write!(f, "EXPORT_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - operation refused, nothing changed
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information shown to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            suggestions: vec![],
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for spendboard-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{message}")]
    Validation { message: String },

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Category already exists: {name}")]
    DuplicateCategory { name: String },

    #[error("Export failed: {message}")]
    Export { message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation {
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Validation { .. } => ErrorCode::ValidationError,
            CoreError::InvalidDateRange { .. } => ErrorCode::InvalidDateRange,
            CoreError::DuplicateCategory { .. } => ErrorCode::DuplicateEntry,
            CoreError::Export { .. } => ErrorCode::ExportError,
            CoreError::Io(_) => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Validation { .. }
            | CoreError::InvalidDateRange { .. }
            | CoreError::DuplicateCategory { .. } => ErrorSeverity::Warning,
            CoreError::Export { .. } | CoreError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::InvalidDateRange { .. } => {
                details = details.with_suggestion(
                    "The end date has been cleared; pick an end date on or after the start date."
                        .to_string(),
                );
            }
            CoreError::DuplicateCategory { name } => {
                details = details.with_suggestion(format!(
                    "Select the existing '{}' category instead of creating it again.",
                    name
                ));
            }
            CoreError::Export { .. } | CoreError::Io(_) => {
                details = details
                    .with_suggestion("Check that the output path is writable.".to_string());
            }
            CoreError::Validation { .. } => {}
        }

        details
    }
}

impl From<csv::Error> for CoreError {
    fn from(error: csv::Error) -> Self {
        CoreError::Export {
            message: error.to_string(),
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::InvalidDateRange.to_string(), "INVALID_DATE_RANGE");
    }

    #[test]
    fn test_validation_message_is_bare() {
        let error = CoreError::validation("Amount must be greater than zero");
        assert_eq!(error.to_string(), "Amount must be greater than zero");
        assert_eq!(error.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_date_range_details() {
        let error = CoreError::InvalidDateRange {
            start: "2024-03-10".to_string(),
            end: "2024-03-01".to_string(),
        };
        let details = error.to_details();
        assert_eq!(details.code, ErrorCode::InvalidDateRange);
        assert!(details.message.contains("2024-03-10"));
        assert_eq!(details.suggestions.len(), 1);
    }

    #[test]
    fn test_io_error_conversion() {
        let error: CoreError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(error.code(), ErrorCode::IoError);
        assert_eq!(error.severity(), ErrorSeverity::Error);
        assert!(error.to_details().to_string().contains("Suggestions"));
    }
}
