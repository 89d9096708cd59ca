use thiserror::Error;

use crate::keys::KeyError;

/// Errors reported by a [`KeyValueStore`](super::KeyValueStore) backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Conditional check failed")]
    ConditionalCheckFailed,
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Throughput exceeded, please retry: {0}")]
    Throttled(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} already exists: {key}")]
    UniqueObjectAlreadyExists {
        entity_type: &'static str,
        key: String,
    },
    #[error("{entity_type} not found: {key}")]
    ObjectDoesNotExist {
        entity_type: &'static str,
        key: String,
    },
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("{entity_type} update gave up after {attempts} attempts: {key}")]
    RetryAttemptsExhausted {
        entity_type: &'static str,
        key: String,
        attempts: u32,
    },
    #[error("More than one {entity_type} found for unique key: {key}")]
    NonUniqueResult {
        entity_type: &'static str,
        key: String,
    },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Key encoding error: {0}")]
    KeyEncoding(#[from] KeyError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    /// Returns true for errors that indicate a defect in the caller's key
    /// design rather than a runtime condition.
    pub fn is_programming_error(&self) -> bool {
        matches!(self, Self::NonUniqueResult { .. })
    }

    /// Returns true if the error was a lost optimistic-concurrency race.
    pub fn is_conditional_check_failure(&self) -> bool {
        matches!(self, Self::Store(StoreError::ConditionalCheckFailed))
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_object_already_exists_display() {
        let error = RepositoryError::UniqueObjectAlreadyExists {
            entity_type: "User",
            key: "USER!!1/PROFILE".to_string(),
        };
        assert_eq!(error.to_string(), "User already exists: USER!!1/PROFILE");
    }

    #[test]
    fn test_object_does_not_exist_display() {
        let error = RepositoryError::ObjectDoesNotExist {
            entity_type: "Subscription",
            key: "SUB!!9/SUB!!9".to_string(),
        };
        assert_eq!(error.to_string(), "Subscription not found: SUB!!9/SUB!!9");
    }

    #[test]
    fn test_retry_attempts_exhausted_display() {
        let error = RepositoryError::RetryAttemptsExhausted {
            entity_type: "FeatureGate",
            key: "GATE/beta".to_string(),
            attempts: 10,
        };
        assert_eq!(
            error.to_string(),
            "FeatureGate update gave up after 10 attempts: GATE/beta"
        );
    }

    #[test]
    fn test_store_error_is_transparent() {
        let error = RepositoryError::from(StoreError::TableNotFound("users".to_string()));
        assert_eq!(error.to_string(), "Table not found: users");
    }

    #[test]
    fn test_key_encoding_error_display() {
        let error = RepositoryError::from(KeyError::InvalidNumber("x".to_string()));
        assert_eq!(error.to_string(), "Key encoding error: Invalid number: x");
    }

    #[test]
    fn test_classification() {
        let non_unique = RepositoryError::NonUniqueResult {
            entity_type: "User",
            key: "k".to_string(),
        };
        assert!(non_unique.is_programming_error());
        assert!(!RepositoryError::InvalidData("x".to_string()).is_programming_error());

        let conflict = RepositoryError::from(StoreError::ConditionalCheckFailed);
        assert!(conflict.is_conditional_check_failure());
        assert!(!non_unique.is_conditional_check_failure());
    }
}
