//! Shared Error Types
//!
//! Error types produced by the platform-agnostic types in `shared`. They are
//! raised before any storage access, so they always describe bad input.
//!
//! # Usage
//!
//! ```rust
//! use lecotes::shared::error::SharedError;
//!
//! let error = SharedError::validation("rangeEnd", "Range end must be greater than range start");
//! assert!(error.to_string().contains("rangeEnd"));
//! ```
use thiserror::Error;

/// Errors raised by shared types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
