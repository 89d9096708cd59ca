//! In-memory key-value store.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tablekit_core::index::{IndexDescriptor, PRIMARY_INDEX};
use tablekit_core::storage::{
    KeyValueStore, PrimaryKey, PutCondition, QueryOutput, QueryRequest, Record, SortDirection,
    StoreError, StoreResult, UpdateRequest, VersionCondition, OBJECT_VERSION_ATTRIBUTE,
};

type Table = BTreeMap<PrimaryKey, Record>;

/// A [`KeyValueStore`] holding every table in memory.
///
/// Tables are created on first write. Conditions, index projection, query
/// ordering and pagination follow the remote store: a secondary index only
/// sees items carrying both of its key attributes, results are ordered by the
/// index sort key, and a limited query hands back the key of the last item it
/// returned.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items stored in `table`.
    pub async fn item_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<Option<Record>> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|t| t.get(key)).cloned())
    }

    async fn put_item(
        &self,
        table: &str,
        item: Record,
        condition: PutCondition,
    ) -> StoreResult<()> {
        let key = PrimaryKey::from_record(&item).ok_or_else(|| {
            StoreError::RequestFailed("item is missing its primary key attributes".to_string())
        })?;

        let mut tables = self.tables.write().await;
        let items = tables.entry(table.to_string()).or_default();

        if condition == PutCondition::KeyNotExists && items.contains_key(&key) {
            return Err(StoreError::ConditionalCheckFailed);
        }

        items.insert(key, item);
        Ok(())
    }

    async fn update_item(&self, table: &str, request: UpdateRequest) -> StoreResult<Record> {
        let touches_key = request
            .set
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(request.remove.iter().map(String::as_str))
            .any(|name| {
                name == PRIMARY_INDEX.partition_key_name || name == PRIMARY_INDEX.sort_key_name
            });
        if touches_key {
            return Err(StoreError::RequestFailed(
                "primary key attributes cannot be updated".to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        let item = tables
            .get_mut(table)
            .and_then(|t| t.get_mut(&request.key))
            .ok_or(StoreError::ConditionalCheckFailed)?;

        let stored_version = item.get(OBJECT_VERSION_ATTRIBUTE);
        let condition_holds = match request.condition {
            VersionCondition::Equals(expected) => {
                stored_version.and_then(|v| v.as_u64()) == Some(expected)
            }
            VersionCondition::Absent => stored_version.is_none(),
        };
        if !condition_holds {
            return Err(StoreError::ConditionalCheckFailed);
        }

        for (name, value) in request.set {
            item.insert(name, value);
        }
        for name in &request.remove {
            item.remove(name);
        }

        Ok(item.clone())
    }

    async fn delete_item(&self, table: &str, key: &PrimaryKey) -> StoreResult<Option<Record>> {
        let mut tables = self.tables.write().await;
        Ok(tables.get_mut(table).and_then(|t| t.remove(key)))
    }

    async fn query(&self, table: &str, request: QueryRequest) -> StoreResult<QueryOutput> {
        if request.limit == Some(0) {
            return Err(StoreError::RequestFailed(
                "limit must be greater than zero".to_string(),
            ));
        }

        let tables = self.tables.read().await;
        let Some(items) = tables.get(table) else {
            return Ok(QueryOutput::default());
        };

        let index = &request.index;
        let mut matches: Vec<(Position, &Record)> = items
            .values()
            .filter_map(|record| Position::of(index, record).map(|p| (p, record)))
            .filter(|(position, _)| position.partition_key == request.partition_key)
            .filter(|(position, _)| match &request.sort_key {
                Some(condition) => condition.matches(&position.sort_key),
                None => true,
            })
            .collect();

        matches.sort_by(|(a, _), (b, _)| a.cmp(b));
        if request.direction == SortDirection::Descending {
            matches.reverse();
        }

        if let Some(start) = &request.exclusive_start_key {
            let start = Position::of(index, start).ok_or_else(|| {
                StoreError::RequestFailed(
                    "exclusive start key does not match the queried index".to_string(),
                )
            })?;
            matches.retain(|(position, _)| match request.direction {
                SortDirection::Ascending => position.cmp(&start) == Ordering::Greater,
                SortDirection::Descending => position.cmp(&start) == Ordering::Less,
            });
        }

        let limit = request.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let has_more = matches.len() > limit;
        matches.truncate(limit);

        let last_evaluated_key = match matches.last() {
            Some((_, record)) if has_more => Some(evaluated_key(index, record)),
            _ => None,
        };

        Ok(QueryOutput {
            items: matches.into_iter().map(|(_, r)| r.clone()).collect(),
            last_evaluated_key,
        })
    }
}

/// Where a record sits inside an index: its index key pair, with the primary
/// key breaking ties between records sharing an index sort key.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Position {
    partition_key: String,
    sort_key: String,
    primary: PrimaryKey,
}

impl Position {
    /// Returns `None` when the record is not projected into `index`.
    fn of(index: &IndexDescriptor, record: &Record) -> Option<Self> {
        let partition_key = record.get(index.partition_key_name)?.as_s()?;
        let sort_key = record.get(index.sort_key_name)?.as_s()?;
        Some(Self {
            partition_key: partition_key.to_string(),
            sort_key: sort_key.to_string(),
            primary: PrimaryKey::from_record(record)?,
        })
    }
}

/// Key attributes of `record` as reported in a last-evaluated key.
fn evaluated_key(index: &IndexDescriptor, record: &Record) -> Record {
    let names = [
        PRIMARY_INDEX.partition_key_name,
        PRIMARY_INDEX.sort_key_name,
        index.partition_key_name,
        index.sort_key_name,
    ];
    names
        .iter()
        .filter_map(|name| {
            record
                .get(*name)
                .map(|value| (name.to_string(), value.clone()))
        })
        .collect()
}
