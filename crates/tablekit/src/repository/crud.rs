//! Repository construction, writes, lookups and deletes.

use std::sync::Arc;

use tablekit_core::entity::EntitySchema;
use tablekit_core::index::{IndexDescriptor, PRIMARY_INDEX};
use tablekit_core::retry::RetryPolicy;
use tablekit_core::serializer::Serializer;
use tablekit_core::storage::{
    is_reserved_attribute, AttributeValue, ExistenceCheck, KeyValueStore, PaginationToken,
    PrimaryKey, PutCondition, QueryPage, QueryRequest, Record, RepositoryError, Result,
    SortKeyCondition, StoreError, DATA_ATTRIBUTE, OBJECT_VERSION_ATTRIBUTE,
};

use super::options::{CompositeKeyQuery, SaveOptions};

/// Generic repository for one entity type stored in the shared table.
///
/// Holds no per-call state: clone it or share it behind an `Arc` and call it
/// from any number of tasks.
pub struct Repository<T> {
    pub(super) store: Arc<dyn KeyValueStore>,
    pub(super) table_name: String,
    pub(super) serializer: Arc<dyn Serializer<T>>,
    pub(super) schema: EntitySchema<T>,
    pub(super) retry_policy: RetryPolicy,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            table_name: self.table_name.clone(),
            serializer: Arc::clone(&self.serializer),
            schema: self.schema.clone(),
            retry_policy: self.retry_policy,
        }
    }
}

impl<T> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("table_name", &self.table_name)
            .field("entity_type", &self.schema.entity_type())
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl<T> Repository<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        table_name: impl Into<String>,
        serializer: impl Serializer<T> + 'static,
        schema: EntitySchema<T>,
    ) -> Self {
        Self {
            store,
            table_name: table_name.into(),
            serializer: Arc::new(serializer),
            schema,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn schema(&self) -> &EntitySchema<T> {
        &self.schema
    }

    pub(super) fn entity_type(&self) -> &'static str {
        self.schema.entity_type()
    }

    /// Writes `entity` under `key`.
    ///
    /// Fails with [`RepositoryError::UniqueObjectAlreadyExists`] when the
    /// existence check finds a conflicting record. `ExistenceCheck::Primary`
    /// probes the partition before the conditional put; a record written into
    /// the partition between the probe and the put under a different sort key
    /// is not detected.
    ///
    /// Only the index attributes in `options` are written; the schema's own
    /// derivation is applied by [`Repository::create`]. Later updates refresh
    /// just the index attributes the record was saved with.
    pub async fn save(&self, entity: &T, key: &PrimaryKey, options: SaveOptions) -> Result<()> {
        if key.partition_key.is_empty() || key.sort_key.is_empty() {
            return Err(RepositoryError::InvalidParameters(
                "primary key values must not be empty".to_string(),
            ));
        }
        if options.index_attributes.targets_primary_index() {
            return Err(RepositoryError::InvalidParameters(
                "index attributes may only target secondary indexes".to_string(),
            ));
        }
        self.schema.validate(entity)?;

        let record = self.build_record(entity, key, &options)?;

        let condition = match options.existence_check {
            ExistenceCheck::None => PutCondition::None,
            ExistenceCheck::Composite => PutCondition::KeyNotExists,
            ExistenceCheck::Primary => {
                self.ensure_partition_unused(key).await?;
                PutCondition::KeyNotExists
            }
        };

        self.store
            .put_item(&self.table_name, record, condition)
            .await
            .map_err(|err| match err {
                StoreError::ConditionalCheckFailed => self.already_exists(key),
                other => RepositoryError::Store(other),
            })?;

        tracing::debug!(
            table = %self.table_name,
            entity_type = self.entity_type(),
            %key,
            existence_check = ?options.existence_check,
            denormalized = options.denormalize,
            "Saved record"
        );

        Ok(())
    }

    /// Saves `entity` under the key and index attributes its schema derives.
    ///
    /// Returns the primary key the entity was written under.
    pub async fn create(&self, entity: &T, existence_check: ExistenceCheck) -> Result<PrimaryKey> {
        let key = self.schema.primary_key(entity);
        let options = SaveOptions::new(existence_check)
            .with_index_attributes(self.schema.index_attributes(entity));

        self.save(entity, &key, options).await?;
        Ok(key)
    }

    /// Point or prefix lookup of a record that must be unique.
    ///
    /// Returns `Ok(None)` when nothing matches. More than one match means the
    /// key design does not identify a single record and fails with
    /// [`RepositoryError::NonUniqueResult`].
    pub async fn get_unique_by_composite_key(
        &self,
        partition_key: &str,
        sort_key: Option<SortKeyCondition>,
        index: Option<&IndexDescriptor>,
    ) -> Result<Option<T>> {
        let index = index.unwrap_or(&PRIMARY_INDEX);
        let mut request = QueryRequest::new(index, partition_key);
        request.sort_key = sort_key;
        request.limit = Some(2);

        let output = self.store.query(&self.table_name, request).await?;

        match output.items.as_slice() {
            [] => Ok(None),
            [record] => self.decode(record).map(Some),
            _ => {
                let key = format!("{} on {}", partition_key, index.display_name());
                tracing::error!(
                    table = %self.table_name,
                    entity_type = self.entity_type(),
                    key = %key,
                    "Unique lookup matched more than one record"
                );
                Err(RepositoryError::NonUniqueResult {
                    entity_type: self.entity_type(),
                    key,
                })
            }
        }
    }

    /// Reads one page of records from a partition.
    ///
    /// Feed `next_pagination_token` back through [`CompositeKeyQuery::after`]
    /// until it comes back `None` to visit every matching record.
    pub async fn query_by_composite_key(&self, query: CompositeKeyQuery) -> Result<QueryPage<T>> {
        if query.partition_key.is_empty() {
            return Err(RepositoryError::InvalidParameters(
                "partition key must not be empty".to_string(),
            ));
        }
        if query.limit == Some(0) {
            return Err(RepositoryError::InvalidParameters(
                "limit must be greater than zero".to_string(),
            ));
        }

        let index_name = query.index.display_name();
        let request = QueryRequest {
            index: query.index,
            partition_key: query.partition_key,
            sort_key: query.sort_key,
            limit: query.limit,
            direction: query.direction,
            exclusive_start_key: query.pagination_token.map(PaginationToken::into_record),
        };

        let output = self.store.query(&self.table_name, request).await?;

        let items = output
            .items
            .iter()
            .map(|record| self.decode(record))
            .collect::<Result<Vec<_>>>()?;

        tracing::trace!(
            table = %self.table_name,
            entity_type = self.entity_type(),
            index = index_name,
            count = items.len(),
            has_more = output.last_evaluated_key.is_some(),
            "Queried page"
        );

        Ok(QueryPage {
            items,
            next_pagination_token: output.last_evaluated_key.map(PaginationToken::from_record),
        })
    }

    /// Deletes the record under `key`.
    ///
    /// The delete itself is unconditional; a key with no record fails with
    /// [`RepositoryError::ObjectDoesNotExist`].
    pub async fn delete(&self, key: &PrimaryKey) -> Result<()> {
        let removed = self.store.delete_item(&self.table_name, key).await?;

        match removed {
            Some(_) => {
                tracing::debug!(
                    table = %self.table_name,
                    entity_type = self.entity_type(),
                    %key,
                    "Deleted record"
                );
                Ok(())
            }
            None => Err(self.does_not_exist(key)),
        }
    }

    /// Decodes a stored record, normalized or denormalized.
    pub(super) fn decode(&self, record: &Record) -> Result<T> {
        match record.get(DATA_ATTRIBUTE) {
            Some(AttributeValue::S(data)) => self.serializer.deserialize_from_string(data),
            _ => self.serializer.from_record(record),
        }
    }

    fn build_record(&self, entity: &T, key: &PrimaryKey, options: &SaveOptions) -> Result<Record> {
        let fields = self.serializer.to_record(entity)?;
        let version = stored_version(&fields)?.unwrap_or(0);

        let mut record = if options.denormalize {
            let data = self.serializer.serialize_to_string(entity)?;
            Record::from([(DATA_ATTRIBUTE.to_string(), AttributeValue::S(data))])
        } else {
            if let Some(name) = fields.keys().find(|name| is_reserved_attribute(name)) {
                return Err(RepositoryError::InvalidData(format!(
                    "field `{name}` collides with a reserved attribute"
                )));
            }
            fields
        };

        record.insert(
            OBJECT_VERSION_ATTRIBUTE.to_string(),
            AttributeValue::from(version),
        );
        key.write_into(&mut record);
        options.index_attributes.write_into(&mut record);

        Ok(record)
    }

    async fn ensure_partition_unused(&self, key: &PrimaryKey) -> Result<()> {
        let mut probe = QueryRequest::new(&PRIMARY_INDEX, key.partition_key.clone());
        probe.limit = Some(1);

        let output = self.store.query(&self.table_name, probe).await?;
        if output.items.is_empty() {
            Ok(())
        } else {
            Err(self.already_exists(key))
        }
    }

    pub(super) fn already_exists(&self, key: &PrimaryKey) -> RepositoryError {
        RepositoryError::UniqueObjectAlreadyExists {
            entity_type: self.entity_type(),
            key: key.to_string(),
        }
    }

    pub(super) fn does_not_exist(&self, key: &PrimaryKey) -> RepositoryError {
        RepositoryError::ObjectDoesNotExist {
            entity_type: self.entity_type(),
            key: key.to_string(),
        }
    }
}

/// Reads the `objectVersion` attribute of a record. `Null` counts as absent.
pub(super) fn stored_version(record: &Record) -> Result<Option<u64>> {
    match record.get(OBJECT_VERSION_ATTRIBUTE) {
        None | Some(AttributeValue::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            RepositoryError::InvalidData(format!(
                "{OBJECT_VERSION_ATTRIBUTE} must be a non-negative integer"
            ))
        }),
    }
}
