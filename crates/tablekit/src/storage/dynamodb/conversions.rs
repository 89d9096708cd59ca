//! DynamoDB attribute conversion functions.
//!
//! Pure functions mapping between the SDK's `AttributeValue` and the
//! backend-neutral one in `tablekit_core::storage`. Testable without DynamoDB
//! access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue as SdkValue;
use tablekit_core::index::PRIMARY_INDEX;
use tablekit_core::storage::{AttributeValue, PrimaryKey, Record, StoreError, StoreResult};

pub type Item = HashMap<String, SdkValue>;

/// Convert a neutral attribute value to its SDK form.
pub fn to_sdk(value: &AttributeValue) -> SdkValue {
    match value {
        AttributeValue::S(s) => SdkValue::S(s.clone()),
        AttributeValue::N(n) => SdkValue::N(n.clone()),
        AttributeValue::Bool(b) => SdkValue::Bool(*b),
        AttributeValue::Null => SdkValue::Null(true),
        AttributeValue::L(items) => SdkValue::L(items.iter().map(to_sdk).collect()),
        AttributeValue::M(map) => SdkValue::M(record_to_item(map)),
    }
}

/// Convert an SDK attribute value to its neutral form.
///
/// String and number sets become lists. Binary values are not part of the
/// record model and are rejected.
pub fn from_sdk(value: &SdkValue) -> StoreResult<AttributeValue> {
    match value {
        SdkValue::S(s) => Ok(AttributeValue::S(s.clone())),
        SdkValue::N(n) => Ok(AttributeValue::N(n.clone())),
        SdkValue::Bool(b) => Ok(AttributeValue::Bool(*b)),
        SdkValue::Null(_) => Ok(AttributeValue::Null),
        SdkValue::L(items) => items
            .iter()
            .map(from_sdk)
            .collect::<StoreResult<Vec<_>>>()
            .map(AttributeValue::L),
        SdkValue::M(map) => item_to_record(map).map(AttributeValue::M),
        SdkValue::Ss(values) => Ok(AttributeValue::L(
            values.iter().cloned().map(AttributeValue::S).collect(),
        )),
        SdkValue::Ns(values) => Ok(AttributeValue::L(
            values.iter().cloned().map(AttributeValue::N).collect(),
        )),
        other => Err(StoreError::RequestFailed(format!(
            "unsupported attribute type: {:?}",
            other
        ))),
    }
}

/// Convert a record to a DynamoDB item.
pub fn record_to_item(record: &Record) -> Item {
    record
        .iter()
        .map(|(name, value)| (name.clone(), to_sdk(value)))
        .collect()
}

/// Convert a DynamoDB item to a record.
pub fn item_to_record(item: &Item) -> StoreResult<Record> {
    item.iter()
        .map(|(name, value)| from_sdk(value).map(|v| (name.clone(), v)))
        .collect()
}

/// The primary key as a DynamoDB key map.
pub fn key_to_item(key: &PrimaryKey) -> Item {
    HashMap::from([
        (
            PRIMARY_INDEX.partition_key_name.to_string(),
            SdkValue::S(key.partition_key.clone()),
        ),
        (
            PRIMARY_INDEX.sort_key_name.to_string(),
            SdkValue::S(key.sort_key.clone()),
        ),
    ])
}
