//! Serde-backed serializer.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::{is_reserved_attribute, AttributeValue, Record, RepositoryError, Result};

use super::traits::Serializer;

/// Serializer for any `serde` entity that serializes to a JSON object.
///
/// Field names come from the entity's serde representation, so
/// `#[serde(rename_all = "camelCase")]` controls the stored attribute names.
pub struct JsonSerializer<T> {
    _entity: PhantomData<fn() -> T>,
}

impl<T> JsonSerializer<T> {
    pub fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<T> Default for JsonSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonSerializer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonSerializer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSerializer")
            .field("entity", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> Serializer<T> for JsonSerializer<T>
where
    T: Serialize + DeserializeOwned,
{
    fn to_record(&self, entity: &T) -> Result<Record> {
        match serde_json::to_value(entity).map_err(serialization)? {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, AttributeValue::from_json(v)))
                .collect()),
            other => Err(RepositoryError::Serialization(format!(
                "entity must serialize to an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_record(&self, record: &Record) -> Result<T> {
        let map = record
            .iter()
            .filter(|(name, _)| !is_reserved_attribute(name))
            .map(|(name, value)| {
                value
                    .clone()
                    .into_json()
                    .map(|json| (name.clone(), json))
                    .map_err(RepositoryError::Serialization)
            })
            .collect::<Result<serde_json::Map<_, _>>>()?;

        serde_json::from_value(serde_json::Value::Object(map)).map_err(serialization)
    }

    fn serialize_to_string(&self, entity: &T) -> Result<String> {
        serde_json::to_string(entity).map_err(serialization)
    }

    fn deserialize_from_string(&self, data: &str) -> Result<T> {
        serde_json::from_str(data).map_err(serialization)
    }
}

fn serialization(err: serde_json::Error) -> RepositoryError {
    RepositoryError::Serialization(err.to_string())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    struct Account {
        account_id: String,
        email: String,
        credits: u64,
        nickname: Option<String>,
        object_version: u64,
    }

    fn sample_account() -> Account {
        Account {
            account_id: "acc-1".to_string(),
            email: "ada@example.com".to_string(),
            credits: 12,
            nickname: None,
            object_version: 3,
        }
    }

    #[test]
    fn test_to_record_uses_serde_names() {
        let serializer = JsonSerializer::<Account>::new();
        let record = serializer.to_record(&sample_account()).unwrap();

        assert_eq!(record["accountId"], AttributeValue::S("acc-1".to_string()));
        assert_eq!(record["credits"], AttributeValue::N("12".to_string()));
        assert_eq!(record["nickname"], AttributeValue::Null);
        assert_eq!(record["objectVersion"], AttributeValue::N("3".to_string()));
    }

    #[test]
    fn test_from_record_ignores_key_attributes() {
        let serializer = JsonSerializer::<Account>::new();
        let mut record = serializer.to_record(&sample_account()).unwrap();
        record.insert("PKEY".to_string(), AttributeValue::S("ACCOUNT".to_string()));
        record.insert("GSI1SKEY".to_string(), AttributeValue::S("x".to_string()));

        assert_eq!(serializer.from_record(&record).unwrap(), sample_account());
    }

    #[test]
    fn test_string_round_trip() {
        let serializer = JsonSerializer::<Account>::new();
        let data = serializer.serialize_to_string(&sample_account()).unwrap();
        assert_eq!(
            serializer.deserialize_from_string(&data).unwrap(),
            sample_account()
        );
    }

    #[test]
    fn test_non_object_entities_are_rejected() {
        let serializer = JsonSerializer::<Vec<u32>>::new();
        let err = serializer.to_record(&vec![1, 2]).unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Serialization("entity must serialize to an object, got array".into())
        );
    }

    #[test]
    fn test_from_record_reports_missing_fields() {
        let serializer = JsonSerializer::<Account>::new();
        let record = Record::new();
        assert!(matches!(
            serializer.from_record(&record),
            Err(RepositoryError::Serialization(_))
        ));
    }
}
