//! Per-entity capabilities.
//!
//! An [`EntitySchema`] tells the generic repository how one entity type maps
//! onto the shared table: how to derive its primary key, which secondary
//! indexes it participates in, and how to validate it before persistence.

use std::fmt;
use std::sync::Arc;

use crate::index::IndexAttributes;
use crate::storage::{PrimaryKey, RepositoryError, Result};

type KeyFn<T> = Arc<dyn Fn(&T) -> PrimaryKey + Send + Sync>;
type IndexFn<T> = Arc<dyn Fn(&T) -> IndexAttributes + Send + Sync>;
type ValidateFn<T> = Arc<dyn Fn(&T) -> std::result::Result<(), String> + Send + Sync>;

/// Key derivation, index derivation and validation for one entity type.
pub struct EntitySchema<T> {
    entity_type: &'static str,
    primary_key: KeyFn<T>,
    index_attributes: IndexFn<T>,
    validate: ValidateFn<T>,
}

impl<T> EntitySchema<T> {
    /// Creates a schema with no secondary indexes and no validation.
    pub fn new(
        entity_type: &'static str,
        primary_key: impl Fn(&T) -> PrimaryKey + Send + Sync + 'static,
    ) -> Self {
        Self {
            entity_type,
            primary_key: Arc::new(primary_key),
            index_attributes: Arc::new(|_| IndexAttributes::new()),
            validate: Arc::new(|_| Ok(())),
        }
    }

    /// Sets the secondary index derivation.
    pub fn with_index_attributes(
        mut self,
        index_attributes: impl Fn(&T) -> IndexAttributes + Send + Sync + 'static,
    ) -> Self {
        self.index_attributes = Arc::new(index_attributes);
        self
    }

    /// Sets the validation function. An `Err` message becomes
    /// [`RepositoryError::InvalidData`].
    pub fn with_validation(
        mut self,
        validate: impl Fn(&T) -> std::result::Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Arc::new(validate);
        self
    }

    pub fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    pub fn primary_key(&self, entity: &T) -> PrimaryKey {
        (self.primary_key)(entity)
    }

    pub fn index_attributes(&self, entity: &T) -> IndexAttributes {
        (self.index_attributes)(entity)
    }

    pub fn validate(&self, entity: &T) -> Result<()> {
        (self.validate)(entity).map_err(RepositoryError::InvalidData)
    }
}

impl<T> Clone for EntitySchema<T> {
    fn clone(&self) -> Self {
        Self {
            entity_type: self.entity_type,
            primary_key: Arc::clone(&self.primary_key),
            index_attributes: Arc::clone(&self.index_attributes),
            validate: Arc::clone(&self.validate),
        }
    }
}

impl<T> fmt::Debug for EntitySchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySchema")
            .field("entity_type", &self.entity_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::secondary_index;
    use crate::keys::{encode_key, KeySegment};

    struct Member {
        id: u32,
        email: String,
    }

    fn member_schema() -> EntitySchema<Member> {
        EntitySchema::new("Member", |m: &Member| {
            let key = encode_key(&[KeySegment::from("MEMBER"), KeySegment::from(m.id)]);
            PrimaryKey::new(key.clone(), key)
        })
        .with_index_attributes(|m: &Member| {
            IndexAttributes::new().with(
                secondary_index(1).expect("GSI1 exists"),
                encode_key(&[KeySegment::from("EMAIL"), KeySegment::from(&m.email)]),
                "MEMBER",
            )
        })
        .with_validation(|m: &Member| {
            if m.email.contains('@') {
                Ok(())
            } else {
                Err(format!("invalid email: {}", m.email))
            }
        })
    }

    #[test]
    fn test_primary_key_derivation() {
        let schema = member_schema();
        let member = Member {
            id: 7,
            email: "ada@example.com".to_string(),
        };
        assert_eq!(
            schema.primary_key(&member),
            PrimaryKey::new("MEMBER!!7", "MEMBER!!7")
        );
        assert_eq!(schema.entity_type(), "Member");
    }

    #[test]
    fn test_index_attribute_derivation() {
        let schema = member_schema();
        let member = Member {
            id: 7,
            email: "ada@example.com".to_string(),
        };
        let attributes = schema.index_attributes(&member);
        let gsi1 = attributes.get(secondary_index(1).unwrap()).unwrap();
        assert_eq!(gsi1.partition_key, "EMAIL!!ada@example.com");
    }

    #[test]
    fn test_validation_maps_to_invalid_data() {
        let schema = member_schema();
        let member = Member {
            id: 1,
            email: "nope".to_string(),
        };
        assert_eq!(
            schema.validate(&member),
            Err(RepositoryError::InvalidData("invalid email: nope".to_string()))
        );
    }

    #[test]
    fn test_defaults_accept_everything() {
        let schema = EntitySchema::new("Plain", |_: &Member| PrimaryKey::new("P", "S"));
        let member = Member {
            id: 1,
            email: String::new(),
        };
        assert!(schema.validate(&member).is_ok());
        assert!(schema.index_attributes(&member).is_empty());
    }
}
