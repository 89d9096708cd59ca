//! Table configuration types (Functional Core - pure data).
//!
//! The desired table layout is derived from the index registry in
//! `tablekit_core::index`, so the deployed table always matches the key
//! attributes the repository writes.

use tablekit_core::index::{IndexDescriptor, PRIMARY_INDEX, SECONDARY_INDEXES};

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: String,
    pub sort_key: String,
    pub gsis: Vec<GsiConfig>,
}

/// Global Secondary Index configuration. All key attributes are strings and
/// every index projects all attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: String,
    pub sort_key: String,
}

impl GsiConfig {
    fn from_descriptor(index: &IndexDescriptor) -> Option<Self> {
        Some(Self {
            name: index.index_name?.to_string(),
            partition_key: index.partition_key_name.to_string(),
            sort_key: index.sort_key_name.to_string(),
        })
    }
}

impl TableConfig {
    /// Every attribute name used as a key by the table or one of its indexes.
    pub fn key_attributes(&self) -> Vec<&str> {
        let mut names = vec![self.partition_key.as_str(), self.sort_key.as_str()];
        for gsi in &self.gsis {
            names.push(&gsi.partition_key);
            names.push(&gsi.sort_key);
        }
        names
    }
}

/// Returns the table configuration for `table_name`: the primary key plus
/// every registered secondary index. Billing is always on-demand.
pub fn tablekit_table_config(table_name: &str) -> TableConfig {
    TableConfig {
        table_name: table_name.to_string(),
        partition_key: PRIMARY_INDEX.partition_key_name.to_string(),
        sort_key: PRIMARY_INDEX.sort_key_name.to_string(),
        gsis: SECONDARY_INDEXES
            .iter()
            .filter_map(GsiConfig::from_descriptor)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_config_covers_registry() {
        let config = tablekit_table_config("accounts");

        assert_eq!(config.table_name, "accounts");
        assert_eq!(config.partition_key, "PKEY");
        assert_eq!(config.sort_key, "SKEY");
        assert_eq!(config.gsis.len(), 20);
        assert_eq!(
            config.gsis[0],
            GsiConfig {
                name: "GSI1".to_string(),
                partition_key: "GSI1PKEY".to_string(),
                sort_key: "GSI1SKEY".to_string(),
            }
        );
        assert_eq!(config.gsis[19].name, "GSI20");
    }

    #[test]
    fn test_key_attributes_are_distinct() {
        let config = tablekit_table_config("t");
        let mut names = config.key_attributes();
        assert_eq!(names.len(), 42);

        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 42);
    }
}
