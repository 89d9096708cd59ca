//! Secondary index attributes attached to a record.

use crate::storage::{AttributeValue, Record};

use super::registry::IndexDescriptor;

/// Partition and sort values for one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexAttribute {
    pub index: IndexDescriptor,
    pub partition_key: String,
    pub sort_key: String,
}

/// The secondary index entries an entity participates in.
///
/// Entity-specific logic builds these (e.g. "index users by email") and the
/// repository writes them next to the primary key. Setting the same index twice
/// keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexAttributes {
    entries: Vec<IndexAttribute>,
}

impl IndexAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the entry for `index`.
    pub fn with(
        mut self,
        index: &IndexDescriptor,
        partition_key: impl Into<String>,
        sort_key: impl Into<String>,
    ) -> Self {
        let entry = IndexAttribute {
            index: *index,
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        };
        match self.entries.iter_mut().find(|e| e.index == *index) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexAttribute> {
        self.entries.iter()
    }

    /// Returns the entry for `index`, if set.
    pub fn get(&self, index: &IndexDescriptor) -> Option<&IndexAttribute> {
        self.entries.iter().find(|e| e.index == *index)
    }

    /// Returns true if any entry targets the primary index.
    pub fn targets_primary_index(&self) -> bool {
        self.entries.iter().any(|e| e.index.is_primary())
    }

    /// Flattens the entries into `(attribute name, value)` pairs.
    pub fn to_attributes(&self) -> Vec<(String, AttributeValue)> {
        self.entries
            .iter()
            .flat_map(|e| {
                [
                    (
                        e.index.partition_key_name.to_string(),
                        AttributeValue::S(e.partition_key.clone()),
                    ),
                    (
                        e.index.sort_key_name.to_string(),
                        AttributeValue::S(e.sort_key.clone()),
                    ),
                ]
            })
            .collect()
    }

    /// Writes the entries into a record.
    pub fn write_into(&self, record: &mut Record) {
        record.extend(self.to_attributes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{primary_index, secondary_index};

    #[test]
    fn test_write_into_sets_both_attributes() {
        let gsi1 = secondary_index(1).unwrap();
        let attributes = IndexAttributes::new().with(gsi1, "EMAIL!!ada@example.com", "USER");

        let mut record = Record::new();
        attributes.write_into(&mut record);

        assert_eq!(
            record["GSI1PKEY"],
            AttributeValue::S("EMAIL!!ada@example.com".to_string())
        );
        assert_eq!(record["GSI1SKEY"], AttributeValue::S("USER".to_string()));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_with_replaces_existing_entry() {
        let gsi2 = secondary_index(2).unwrap();
        let attributes = IndexAttributes::new()
            .with(gsi2, "A", "1")
            .with(gsi2, "B", "2");

        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes.get(gsi2).unwrap().partition_key, "B");
    }

    #[test]
    fn test_targets_primary_index() {
        let attributes = IndexAttributes::new().with(secondary_index(3).unwrap(), "A", "B");
        assert!(!attributes.targets_primary_index());

        let attributes = attributes.with(primary_index(), "A", "B");
        assert!(attributes.targets_primary_index());
    }
}
