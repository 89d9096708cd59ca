//! Field-level updates under optimistic concurrency.

use tablekit_core::storage::{
    is_reserved_attribute, AttributeValue, FieldChange, FieldChanges, PrimaryKey, Record,
    RepositoryError, Result, UpdateRequest, VersionCondition, DATA_ATTRIBUTE,
    OBJECT_VERSION_ATTRIBUTE,
};

use super::crud::{stored_version, Repository};
use super::retry::retry_on_conflict;

/// Merged entity plus the attribute writes that persist it.
struct MergedUpdate<T> {
    entity: T,
    set: Vec<(String, AttributeValue)>,
    remove: Vec<String>,
}

impl<T> Repository<T>
where
    T: Send + Sync + 'static,
{
    /// Applies `changes` to the record under `key` and returns the updated
    /// entity.
    ///
    /// Each attempt reads the record, merges the changes, validates the
    /// result and writes it back on condition that `objectVersion` still holds
    /// the value it read. Lost races are retried per the repository's
    /// [`RetryPolicy`](tablekit_core::retry::RetryPolicy); once it runs out the
    /// call fails with [`RepositoryError::RetryAttemptsExhausted`].
    ///
    /// Empty changes, or changes to key attributes, `data` or `objectVersion`,
    /// fail with [`RepositoryError::InvalidParameters`] without touching the
    /// store. So does setting a field the entity type does not carry, which is
    /// caught after the read and before any write.
    ///
    /// Secondary-index attributes derived by the schema are refreshed only
    /// when the stored record already has them.
    pub async fn update(&self, key: &PrimaryKey, changes: FieldChanges) -> Result<T> {
        validate_changes(&changes)?;

        let entity = retry_on_conflict(&self.retry_policy, self.entity_type(), key, |attempt| {
            self.try_update(key, &changes, attempt)
        })
        .await?;

        tracing::debug!(
            table = %self.table_name,
            entity_type = self.entity_type(),
            %key,
            fields = changes.len(),
            "Updated record"
        );

        Ok(entity)
    }

    async fn try_update(&self, key: &PrimaryKey, changes: &FieldChanges, attempt: u32) -> Result<T> {
        let current = self
            .store
            .get_item(&self.table_name, key)
            .await?
            .ok_or_else(|| self.does_not_exist(key))?;

        let read_version = stored_version(&current)?;
        let (condition, next_version) = match read_version {
            Some(version) => {
                let next = version.checked_add(1).ok_or_else(|| {
                    RepositoryError::InvalidData(format!("{OBJECT_VERSION_ATTRIBUTE} overflow"))
                })?;
                (VersionCondition::Equals(version), next)
            }
            None => (VersionCondition::Absent, 1),
        };

        let MergedUpdate {
            entity,
            mut set,
            remove,
        } = match current.get(DATA_ATTRIBUTE) {
            Some(AttributeValue::S(data)) => self.merge_denormalized(data, changes, next_version)?,
            _ => self.merge_normalized(&current, changes, next_version)?,
        };

        let persisted = self.serializer.to_record(&entity)?;
        if let Some(field) = unknown_field(&persisted, changes) {
            return Err(RepositoryError::InvalidParameters(format!(
                "{} has no field `{field}`",
                self.entity_type()
            )));
        }

        self.schema.validate(&entity)?;

        for (name, value) in self.schema.index_attributes(&entity).to_attributes() {
            if current.get(&name).is_some_and(|stored| *stored != value) {
                set.push((name, value));
            }
        }

        tracing::trace!(
            table = %self.table_name,
            %key,
            attempt,
            expected_version = ?read_version,
            "Submitting conditional update"
        );

        let request = UpdateRequest {
            key: key.clone(),
            set,
            remove,
            condition,
        };
        let stored = self.store.update_item(&self.table_name, request).await?;

        self.decode(&stored)
    }

    fn merge_normalized(
        &self,
        current: &Record,
        changes: &FieldChanges,
        next_version: u64,
    ) -> Result<MergedUpdate<T>> {
        let mut fields = current.clone();
        apply_changes(&mut fields, changes);

        let mut set: Vec<(String, AttributeValue)> = changes
            .iter()
            .filter_map(|(field, change)| match change {
                FieldChange::Set(value) => Some((field.to_string(), value.clone())),
                FieldChange::Remove => None,
            })
            .collect();
        let remove = changes
            .iter()
            .filter(|(_, change)| matches!(change, FieldChange::Remove))
            .map(|(field, _)| field.to_string())
            .collect();

        let version = AttributeValue::from(next_version);
        fields.insert(OBJECT_VERSION_ATTRIBUTE.to_string(), version.clone());
        set.push((OBJECT_VERSION_ATTRIBUTE.to_string(), version));

        let entity = self
            .serializer
            .from_record(&fields)
            .map_err(|err| self.invalid_changes(err))?;

        Ok(MergedUpdate {
            entity,
            set,
            remove,
        })
    }

    fn merge_denormalized(
        &self,
        data: &str,
        changes: &FieldChanges,
        next_version: u64,
    ) -> Result<MergedUpdate<T>> {
        let stored = self.serializer.deserialize_from_string(data)?;
        let mut fields = self.serializer.to_record(&stored)?;
        apply_changes(&mut fields, changes);

        let version = AttributeValue::from(next_version);
        if fields.contains_key(OBJECT_VERSION_ATTRIBUTE) {
            fields.insert(OBJECT_VERSION_ATTRIBUTE.to_string(), version.clone());
        }

        let entity = self
            .serializer
            .from_record(&fields)
            .map_err(|err| self.invalid_changes(err))?;
        let data = self.serializer.serialize_to_string(&entity)?;

        Ok(MergedUpdate {
            entity,
            set: vec![
                (DATA_ATTRIBUTE.to_string(), AttributeValue::S(data)),
                (OBJECT_VERSION_ATTRIBUTE.to_string(), version),
            ],
            remove: Vec::new(),
        })
    }

    fn invalid_changes(&self, err: RepositoryError) -> RepositoryError {
        match err {
            RepositoryError::Serialization(message) => RepositoryError::InvalidParameters(format!(
                "changes do not produce a valid {}: {message}",
                self.entity_type()
            )),
            other => other,
        }
    }
}

fn apply_changes(fields: &mut Record, changes: &FieldChanges) {
    for (field, change) in changes.iter() {
        match change {
            FieldChange::Set(value) => {
                fields.insert(field.to_string(), value.clone());
            }
            FieldChange::Remove => {
                fields.remove(field);
            }
        }
    }
}

/// First non-null SET whose field does not survive a round trip through the
/// entity type.
fn unknown_field<'a>(persisted: &Record, changes: &'a FieldChanges) -> Option<&'a str> {
    changes.iter().find_map(|(field, change)| match change {
        FieldChange::Set(AttributeValue::Null) | FieldChange::Remove => None,
        FieldChange::Set(_) if persisted.contains_key(field) => None,
        FieldChange::Set(_) => Some(field),
    })
}

fn validate_changes(changes: &FieldChanges) -> Result<()> {
    if changes.is_empty() {
        return Err(RepositoryError::InvalidParameters(
            "no field changes supplied".to_string(),
        ));
    }

    let managed = changes.fields().find(|field| {
        field.is_empty() || is_reserved_attribute(field) || *field == OBJECT_VERSION_ATTRIBUTE
    });
    match managed {
        Some("") => Err(RepositoryError::InvalidParameters(
            "field names must not be empty".to_string(),
        )),
        Some(field) => Err(RepositoryError::InvalidParameters(format!(
            "field `{field}` is managed by the repository and cannot be changed"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_changes_rejects_empty() {
        assert!(matches!(
            validate_changes(&FieldChanges::new()),
            Err(RepositoryError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_validate_changes_rejects_managed_fields() {
        for field in ["PKEY", "SKEY", "GSI7SKEY", "data", "objectVersion", ""] {
            let changes = FieldChanges::new().set(field, "x");
            assert!(
                matches!(
                    validate_changes(&changes),
                    Err(RepositoryError::InvalidParameters(_))
                ),
                "{field} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_changes_accepts_entity_fields() {
        let changes = FieldChanges::new().set("name", "Ada").remove("nickname");
        assert!(validate_changes(&changes).is_ok());
    }

    #[test]
    fn test_apply_changes() {
        let mut fields = Record::from([
            ("name".to_string(), AttributeValue::from("Ada")),
            ("nickname".to_string(), AttributeValue::from("A")),
        ]);
        let changes = FieldChanges::new()
            .set("name", "Grace")
            .remove("nickname")
            .set("credits", 3u64);

        apply_changes(&mut fields, &changes);

        assert_eq!(fields["name"], AttributeValue::from("Grace"));
        assert_eq!(fields["credits"], AttributeValue::from(3u64));
        assert!(!fields.contains_key("nickname"));
    }

    #[test]
    fn test_unknown_field() {
        let persisted = Record::from([
            ("name".to_string(), AttributeValue::from("Ada")),
            ("credits".to_string(), AttributeValue::from(3u64)),
        ]);

        let known = FieldChanges::new().set("name", "Grace").remove("nickname");
        assert_eq!(unknown_field(&persisted, &known), None);

        let cleared = FieldChanges::new().set("nickname", AttributeValue::Null);
        assert_eq!(unknown_field(&persisted, &cleared), None);

        let typo = FieldChanges::new().set("credits", 4u64).set("credtis", 42u64);
        assert_eq!(unknown_field(&persisted, &typo), Some("credtis"));
    }
}
