/**
 * Annotation Engine Errors
 *
 * Every engine operation fails with exactly one of these kinds. Errors are
 * terminal for the operation: the engine never retries and never substitutes
 * a fallback value.
 */

use thiserror::Error;

use crate::backend::annotations::store::StoreError;
use crate::shared::SharedError;

/// Errors returned by `AnnotationEngine` operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced text, annotation or reply does not exist
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A required field is missing or invalid
    #[error("Validation error in field '{field}': {message}")]
    Validation { field: String, message: String },

    /// The user has already voted on this target
    #[error("User has already voted")]
    AlreadyVoted,

    /// The caller may not perform this operation
    #[error("Not authorized to delete this {entity}")]
    Forbidden { entity: &'static str },

    /// A concurrent write invalidated an in-flight unit of work
    #[error("Concurrent update conflicted with this request, please retry")]
    ConflictOnMerge,

    /// Opaque persistence failure
    #[error(transparent)]
    Storage(StoreError),
}

impl EngineError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(entity: &'static str) -> Self {
        Self::Forbidden { entity }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SerializationFailure { .. } => Self::ConflictOnMerge,
            other => Self::Storage(other),
        }
    }
}

impl From<SharedError> for EngineError {
    fn from(err: SharedError) -> Self {
        let SharedError::ValidationError { field, message } = err;
        Self::Validation { field, message }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_serialization_failure_becomes_conflict() {
        let err: EngineError = StoreError::SerializationFailure {
            message: "could not serialize access".to_string(),
        }
        .into();
        assert_matches!(err, EngineError::ConflictOnMerge);
    }

    #[test]
    fn test_query_failure_stays_storage() {
        let err: EngineError = StoreError::query("connection reset").into();
        assert_matches!(err, EngineError::Storage(StoreError::Query { .. }));
    }

    #[test]
    fn test_shared_validation_maps_field() {
        let err: EngineError = SharedError::validation("rangeEnd", "too small").into();
        assert_matches!(err, EngineError::Validation { ref field, .. } if field == "rangeEnd");
    }

    #[test]
    fn test_messages() {
        assert_eq!(EngineError::not_found("annotation").to_string(), "annotation not found");
        assert_eq!(
            EngineError::forbidden("reply").to_string(),
            "Not authorized to delete this reply"
        );
    }
}
