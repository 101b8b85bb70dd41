/**
 * Backend Error Types
 *
 * Errors returned by HTTP handlers. Each variant maps to one status code
 * and is rendered as a JSON body by `conversion`.
 *
 * # Status Code Mapping
 *
 * - `HandlerError` - the status carried by the error
 * - `Engine` - 404 / 400 / 409 / 403 / 409 / 500 by engine error kind
 * - `Database` - 500, or 409 for unique violations
 * - `DatabaseUnavailable` - 503
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::annotations::EngineError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use axum::http::StatusCode;
/// use lecotes::backend::error::BackendError;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Title is required");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., missing fields, bad credentials)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Annotation engine error
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Direct database access failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The route needs PostgreSQL but no `DATABASE_URL` was configured
    #[error("Database not configured")]
    DatabaseUnavailable,
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Engine(err) => match err {
                EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
                EngineError::Validation { .. } => StatusCode::BAD_REQUEST,
                EngineError::AlreadyVoted => StatusCode::CONFLICT,
                EngineError::Forbidden { .. } => StatusCode::FORBIDDEN,
                EngineError::ConflictOnMerge => StatusCode::CONFLICT,
                EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                StatusCode::CONFLICT
            }
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message shown to the client
    ///
    /// Storage details are logged, never returned.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Engine(EngineError::Storage(_)) => "Internal server error".to_string(),
            Self::Engine(err) => err.to_string(),
            Self::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                "Resource already exists".to_string()
            }
            Self::Database(_) => "Internal server error".to_string(),
            Self::DatabaseUnavailable => "Database not configured".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::annotations::store::StoreError;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
        match error {
            BackendError::HandlerError { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Invalid request");
            }
            _ => panic!("Expected HandlerError"),
        }
    }

    #[test]
    fn test_engine_status_mapping() {
        let cases = [
            (EngineError::not_found("text"), StatusCode::NOT_FOUND),
            (EngineError::validation("content", "empty"), StatusCode::BAD_REQUEST),
            (EngineError::AlreadyVoted, StatusCode::CONFLICT),
            (EngineError::forbidden("reply"), StatusCode::FORBIDDEN),
            (EngineError::ConflictOnMerge, StatusCode::CONFLICT),
            (
                EngineError::Storage(StoreError::query("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(BackendError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_storage_message_is_hidden() {
        let err = BackendError::from(EngineError::Storage(StoreError::query("relation missing")));
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_database_unavailable() {
        let err = BackendError::DatabaseUnavailable;
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_range_validation_is_bad_request() {
        let engine_error: EngineError =
            crate::shared::SharedError::validation("rangeEnd", "too small").into();
        let backend_error: BackendError = engine_error.into();
        assert_eq!(backend_error.status_code(), StatusCode::BAD_REQUEST);
        assert!(backend_error.message().contains("rangeEnd"));
    }
}
