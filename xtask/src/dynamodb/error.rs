//! Error types for DynamoDB operations.

use aws_sdk_dynamodb::error::DisplayErrorContext;
use thiserror::Error;

/// Result type alias for dynamodb module.
pub type Result<T> = std::result::Result<T, DynamodbError>;

/// Errors that can occur during DynamoDB operations.
#[derive(Error, Debug)]
pub enum DynamodbError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("Table '{table_name}' is {status}, try again once it settles")]
    TableBusy { table_name: String, status: String },

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Timeout waiting for table '{table_name}' to become active")]
    TableActivationTimeout { table_name: String },

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Maps an SDK or builder error into [`DynamodbError::AwsSdk`], keeping the
/// full source chain in the message.
pub fn aws_sdk(err: impl std::error::Error) -> DynamodbError {
    DynamodbError::AwsSdk(DisplayErrorContext(&err).to_string())
}
