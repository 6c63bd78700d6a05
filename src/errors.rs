//! # Application Error Types
//!
//! This module defines common error types used throughout the UPSC quiz bot.
//! It provides structured error handling for configuration, abbreviation
//! storage and persistence of the abbreviation dictionary.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Validation errors (abbreviation tables, inputs, etc.)
    Validation(String),
    /// File system errors
    FileSystem(String),
    /// Serialization and deserialization errors
    Serialization(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::FileSystem(msg) => write!(f, "[FILESYSTEM] {}", msg),
            AppError::Serialization(msg) => write!(f, "[SERIALIZATION] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    /// Log a failed quiz submission with the context needed to reproduce it
    pub fn log_submission_error(
        error: &impl std::fmt::Display,
        operation: &str,
        chat_id: i64,
        option_count: Option<usize>,
        question_length: Option<usize>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            chat_id = %chat_id,
            option_count = ?option_count,
            question_length = ?question_length,
            "Quiz submission failed"
        );
    }

    /// Log file system errors with path and operation context
    pub fn log_filesystem_error(error: &impl std::fmt::Display, operation: &str, path: Option<&str>) {
        error!(
            error = %error,
            operation = %operation,
            path = ?path,
            "File system operation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}
