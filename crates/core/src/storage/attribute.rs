//! Store-agnostic attribute model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single attribute value as persisted by the store.
///
/// Numbers are carried as decimal strings, the way the store transmits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    S(String),
    N(String),
    Bool(bool),
    Null,
    L(Vec<AttributeValue>),
    M(HashMap<String, AttributeValue>),
}

/// A flat attribute map, one per stored item.
pub type Record = HashMap<String, AttributeValue>;

impl AttributeValue {
    /// Returns the string if this is an `S` value.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the decimal string if this is an `N` value.
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    /// Parses an `N` value as an unsigned integer.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_n().and_then(|n| n.parse().ok())
    }

    /// Converts a JSON value into an attribute value.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::N(n.to_string()),
            serde_json::Value::String(s) => Self::S(s),
            serde_json::Value::Array(values) => {
                Self::L(values.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => Self::M(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts an attribute value back into JSON.
    ///
    /// Fails if an `N` value is not a valid JSON number.
    pub fn into_json(self) -> Result<serde_json::Value, String> {
        Ok(match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(b),
            Self::S(s) => serde_json::Value::String(s),
            Self::N(n) => match serde_json::from_str::<serde_json::Value>(&n) {
                Ok(number @ serde_json::Value::Number(_)) => number,
                _ => return Err(format!("Invalid number attribute: {n}")),
            },
            Self::L(values) => serde_json::Value::Array(
                values
                    .into_iter()
                    .map(Self::into_json)
                    .collect::<Result<_, _>>()?,
            ),
            Self::M(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| v.into_json().map(|v| (k, v)))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::S(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::S(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        Self::from_json(value)
    }
}

macro_rules! attribute_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    Self::N(value.to_string())
                }
            }
        )*
    };
}

attribute_from_integer!(i32, i64, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_maps_every_kind() {
        let value = AttributeValue::from_json(json!({
            "name": "Ada",
            "age": 36,
            "active": true,
            "nickname": null,
            "tags": ["a", 1.5],
        }));

        let AttributeValue::M(map) = value else {
            panic!("expected a map");
        };
        assert_eq!(map["name"], AttributeValue::S("Ada".to_string()));
        assert_eq!(map["age"], AttributeValue::N("36".to_string()));
        assert_eq!(map["active"], AttributeValue::Bool(true));
        assert_eq!(map["nickname"], AttributeValue::Null);
        assert_eq!(
            map["tags"],
            AttributeValue::L(vec![
                AttributeValue::S("a".to_string()),
                AttributeValue::N("1.5".to_string()),
            ])
        );
    }

    #[test]
    fn test_into_json_restores_numbers() {
        let json = AttributeValue::N("42".to_string()).into_json().unwrap();
        assert_eq!(json, json!(42));

        let json = AttributeValue::N("-2.5".to_string()).into_json().unwrap();
        assert_eq!(json, json!(-2.5));
    }

    #[test]
    fn test_into_json_rejects_bad_numbers() {
        assert!(AttributeValue::N("abc".to_string()).into_json().is_err());
        assert!(AttributeValue::N("\"1\"".to_string()).into_json().is_err());
    }

    #[test]
    fn test_as_u64() {
        assert_eq!(AttributeValue::N("7".to_string()).as_u64(), Some(7));
        assert_eq!(AttributeValue::N("-7".to_string()).as_u64(), None);
        assert_eq!(AttributeValue::S("7".to_string()).as_u64(), None);
    }
}
