//! Storage backend implementations.
//!
//! This module provides concrete implementations of the
//! [`KeyValueStore`](tablekit_core::storage::KeyValueStore) trait defined in
//! `tablekit_core::storage`. Backends are selected at compile time via feature
//! flags and may be enabled together.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): in-process store for tests and local development
//! - `dynamodb`: AWS DynamoDB store using `aws-sdk-dynamodb`
//!
//! # Examples
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p tablekit --features dynamodb
//! ```

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p tablekit --features dynamodb"
);

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;
