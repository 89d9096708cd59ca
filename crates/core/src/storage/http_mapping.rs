//! Pure functions for mapping repository errors to HTTP status codes.
//!
//! Outer layers translate [`RepositoryError`] into their own response format;
//! this gives them a consistent starting point.

use super::{RepositoryError, StoreError};

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `UniqueObjectAlreadyExists` -> 409 (Conflict)
/// - `ObjectDoesNotExist` -> 404 (Not Found)
/// - `InvalidParameters`, `InvalidData`, `KeyEncoding` -> 400 (Bad Request)
/// - `RetryAttemptsExhausted` -> 503 (Service Unavailable)
/// - `NonUniqueResult`, `Serialization` -> 500 (Internal Server Error)
/// - `Store` -> 503 for throttling and connection failures, 500 otherwise
///
/// # Examples
///
/// ```
/// use tablekit_core::storage::{repository_error_to_status_code, RepositoryError};
///
/// let error = RepositoryError::ObjectDoesNotExist {
///     entity_type: "User",
///     key: "USER!!1/USER!!1".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::UniqueObjectAlreadyExists { .. } => 409,
        RepositoryError::ObjectDoesNotExist { .. } => 404,
        RepositoryError::InvalidParameters(_) => 400,
        RepositoryError::InvalidData(_) => 400,
        RepositoryError::KeyEncoding(_) => 400,
        RepositoryError::RetryAttemptsExhausted { .. } => 503,
        RepositoryError::NonUniqueResult { .. } => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::Store(StoreError::Throttled(_) | StoreError::ConnectionFailed(_)) => 503,
        RepositoryError::Store(_) => 500,
    }
}
