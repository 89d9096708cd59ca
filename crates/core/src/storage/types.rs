use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::index::{is_key_attribute, IndexDescriptor, PRIMARY_INDEX};

use super::attribute::{AttributeValue, Record};
use super::error::{RepositoryError, Result};

/// Optimistic-concurrency token present on every mutable record.
pub const OBJECT_VERSION_ATTRIBUTE: &str = "objectVersion";

/// Attribute holding the whole serialized entity in denormalized records.
pub const DATA_ATTRIBUTE: &str = "data";

/// Returns true for attributes the repository owns and entities must not use
/// as field names: index key attributes and the denormalized data attribute.
pub fn is_reserved_attribute(name: &str) -> bool {
    name == DATA_ATTRIBUTE || is_key_attribute(name)
}

/// The primary key pair of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub partition_key: String,
    pub sort_key: String,
}

impl PrimaryKey {
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }

    /// Reads the primary key attributes of a record.
    pub fn from_record(record: &Record) -> Option<Self> {
        let partition_key = record.get(PRIMARY_INDEX.partition_key_name)?.as_s()?;
        let sort_key = record.get(PRIMARY_INDEX.sort_key_name)?.as_s()?;
        Some(Self::new(partition_key, sort_key))
    }

    /// Writes the primary key attributes into a record.
    pub fn write_into(&self, record: &mut Record) {
        record.insert(
            PRIMARY_INDEX.partition_key_name.to_string(),
            AttributeValue::S(self.partition_key.clone()),
        );
        record.insert(
            PRIMARY_INDEX.sort_key_name.to_string(),
            AttributeValue::S(self.sort_key.clone()),
        );
    }

    /// Returns the key as a two-attribute record.
    pub fn to_record(&self) -> Record {
        let mut record = Record::with_capacity(2);
        self.write_into(&mut record);
        record
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.sort_key)
    }
}

/// Uniqueness check performed when saving a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistenceCheck {
    /// Always overwrite.
    #[default]
    None,
    /// Fail if any record already uses the partition key.
    Primary,
    /// Fail if a record with the exact partition/sort pair exists.
    Composite,
}

/// How a sort key value is matched in a lookup or query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKeyMatch {
    #[default]
    Complete,
    BeginsWith,
}

/// Scan order of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A sort key value together with how it should match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKeyCondition {
    pub value: String,
    pub match_type: SortKeyMatch,
}

impl SortKeyCondition {
    pub fn complete(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            match_type: SortKeyMatch::Complete,
        }
    }

    pub fn begins_with(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            match_type: SortKeyMatch::BeginsWith,
        }
    }

    /// Returns true if `candidate` satisfies the condition.
    pub fn matches(&self, candidate: &str) -> bool {
        match self.match_type {
            SortKeyMatch::Complete => candidate == self.value,
            SortKeyMatch::BeginsWith => candidate.starts_with(&self.value),
        }
    }
}

/// Opaque continuation cursor of a paged query.
///
/// Wraps the store's last-evaluated-key attributes. Callers echo it back
/// verbatim; [`PaginationToken::encode`] gives a URL-safe string form for
/// handing it across process boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaginationToken(Record);

impl PaginationToken {
    pub fn from_record(record: Record) -> Self {
        Self(record)
    }

    pub fn as_record(&self) -> &Record {
        &self.0
    }

    pub fn into_record(self) -> Record {
        self.0
    }

    /// Encodes the token as URL-safe base64 JSON.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(&self.0)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decodes a token produced by [`PaginationToken::encode`].
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| RepositoryError::InvalidParameters(format!("pagination token: {e}")))?;
        let record: Record = serde_json::from_slice(&bytes)
            .map_err(|e| RepositoryError::InvalidParameters(format!("pagination token: {e}")))?;
        Ok(Self(record))
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage<T> {
    pub items: Vec<T>,
    /// `None` when there are no more pages.
    pub next_pagination_token: Option<PaginationToken>,
}

/// A single field-level change.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Set(AttributeValue),
    Remove,
}

/// Field-level changes applied by an update, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldChanges {
    changes: BTreeMap<String, FieldChange>,
}

impl FieldChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field` to `value`.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.changes
            .insert(field.into(), FieldChange::Set(value.into()));
        self
    }

    /// Removes `field` from the record.
    pub fn remove(mut self, field: impl Into<String>) -> Self {
        self.changes.insert(field.into(), FieldChange::Remove);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldChange)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for FieldChanges {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |changes, (field, value)| changes.set(field, value))
    }
}

/// Condition attached to a put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutCondition {
    None,
    /// No item with the same primary key may exist.
    KeyNotExists,
}

/// Version predicate attached to an update. Both variants also require the
/// item to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCondition {
    /// The stored version must equal the given value.
    Equals(u64),
    /// The item must not carry a version attribute yet.
    Absent,
}

/// A conditional field-level update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub key: PrimaryKey,
    pub set: Vec<(String, AttributeValue)>,
    pub remove: Vec<String>,
    pub condition: VersionCondition,
}

/// A key-condition query against one index.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub index: IndexDescriptor,
    pub partition_key: String,
    pub sort_key: Option<SortKeyCondition>,
    pub limit: Option<u32>,
    pub direction: SortDirection,
    pub exclusive_start_key: Option<Record>,
}

impl QueryRequest {
    pub fn new(index: &IndexDescriptor, partition_key: impl Into<String>) -> Self {
        Self {
            index: *index,
            partition_key: partition_key.into(),
            sort_key: None,
            limit: None,
            direction: SortDirection::Ascending,
            exclusive_start_key: None,
        }
    }
}

/// Result of a single query call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub items: Vec<Record>,
    pub last_evaluated_key: Option<Record>,
}
