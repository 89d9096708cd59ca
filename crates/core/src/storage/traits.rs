use async_trait::async_trait;

use super::attribute::Record;
use super::error::StoreResult;
use super::types::{PrimaryKey, PutCondition, QueryOutput, QueryRequest, UpdateRequest};

/// Request/response surface of the remote key-value store.
///
/// Implementations hold no per-call state and may be shared across tasks.
/// A failed condition is reported as
/// [`StoreError::ConditionalCheckFailed`](super::StoreError::ConditionalCheckFailed);
/// nothing is retried at this level.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads one item by its exact primary key.
    async fn get_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<Option<Record>>;

    /// Writes a full item, replacing any item with the same primary key.
    async fn put_item(&self, table: &str, item: Record, condition: PutCondition)
        -> StoreResult<()>;

    /// Applies a conditional field-level update and returns the item as stored
    /// afterwards.
    async fn update_item(&self, table: &str, request: UpdateRequest) -> StoreResult<Record>;

    /// Deletes an item unconditionally, returning it if it existed.
    async fn delete_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<Option<Record>>;

    /// Runs a key-condition query against the primary or a secondary index.
    async fn query(&self, table: &str, request: QueryRequest) -> StoreResult<QueryOutput>;
}
