use thiserror::Error;

/// Errors that can occur while building or decoding key segments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Number has more than one decimal point: {0}")]
    MultipleDecimalPoints(String),
    #[error("Number is not finite: {0}")]
    NonFinite(String),
    #[error("Unsupported key segment type: {0}")]
    UnsupportedSegment(String),
    #[error("Invalid lexicographic encoding: {0}")]
    InvalidEncoding(String),
}

/// Result type for key operations.
pub type Result<T> = std::result::Result<T, KeyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_number_display() {
        let error = KeyError::InvalidNumber("12a".to_string());
        assert_eq!(error.to_string(), "Invalid number: 12a");
    }

    #[test]
    fn test_multiple_decimal_points_display() {
        let error = KeyError::MultipleDecimalPoints("1.2.3".to_string());
        assert_eq!(
            error.to_string(),
            "Number has more than one decimal point: 1.2.3"
        );
    }

    #[test]
    fn test_unsupported_segment_display() {
        let error = KeyError::UnsupportedSegment("object".to_string());
        assert_eq!(error.to_string(), "Unsupported key segment type: object");
    }
}
