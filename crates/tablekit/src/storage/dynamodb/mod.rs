//! DynamoDB storage backend implementation.
//!
//! Implements [`KeyValueStore`](tablekit_core::storage::KeyValueStore) using
//! `aws-sdk-dynamodb`. The table layout (primary key plus `GSI1`..`GSI20`) is
//! created by `cargo xtask dynamodb deploy`.

mod conversions;
mod error;
mod expressions;
mod store;

pub use store::DynamoDbStore;
