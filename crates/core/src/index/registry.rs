//! Index registry (Functional Core - pure data).
//!
//! Every table carries one primary index and twenty generic secondary indexes.
//! The set is fixed and provisioned up front whether or not an entity type uses
//! a given index; an entity that does not participate in an index simply leaves
//! its attributes unset.

/// Partition key attribute of the primary index.
pub const PRIMARY_PARTITION_KEY: &str = "PKEY";

/// Sort key attribute of the primary index.
pub const PRIMARY_SORT_KEY: &str = "SKEY";

/// Number of generic secondary indexes.
pub const SECONDARY_INDEX_COUNT: usize = 20;

/// Names the partition/sort attribute pair of an index.
///
/// The primary index has no name; secondary indexes are named `GSI1`..`GSI20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexDescriptor {
    pub partition_key_name: &'static str,
    pub sort_key_name: &'static str,
    pub index_name: Option<&'static str>,
}

impl IndexDescriptor {
    /// Returns true for the primary (unnamed) index.
    pub fn is_primary(&self) -> bool {
        self.index_name.is_none()
    }

    /// Human readable name, `primary` for the primary index.
    pub fn display_name(&self) -> &'static str {
        self.index_name.unwrap_or("primary")
    }
}

/// The primary index.
pub static PRIMARY_INDEX: IndexDescriptor = IndexDescriptor {
    partition_key_name: PRIMARY_PARTITION_KEY,
    sort_key_name: PRIMARY_SORT_KEY,
    index_name: None,
};

macro_rules! gsi {
    ($n:literal) => {
        IndexDescriptor {
            partition_key_name: concat!("GSI", $n, "PKEY"),
            sort_key_name: concat!("GSI", $n, "SKEY"),
            index_name: Some(concat!("GSI", $n)),
        }
    };
}

/// The secondary indexes, `GSI1` first.
pub static SECONDARY_INDEXES: [IndexDescriptor; SECONDARY_INDEX_COUNT] = [
    gsi!(1),
    gsi!(2),
    gsi!(3),
    gsi!(4),
    gsi!(5),
    gsi!(6),
    gsi!(7),
    gsi!(8),
    gsi!(9),
    gsi!(10),
    gsi!(11),
    gsi!(12),
    gsi!(13),
    gsi!(14),
    gsi!(15),
    gsi!(16),
    gsi!(17),
    gsi!(18),
    gsi!(19),
    gsi!(20),
];

/// Returns the primary index.
pub fn primary_index() -> &'static IndexDescriptor {
    &PRIMARY_INDEX
}

/// Returns secondary index `number` (1-based), if it exists.
pub fn secondary_index(number: usize) -> Option<&'static IndexDescriptor> {
    number
        .checked_sub(1)
        .and_then(|position| SECONDARY_INDEXES.get(position))
}

/// Looks a secondary index up by name. The primary index has no name; use
/// [`primary_index`] for it.
pub fn index_by_name(name: &str) -> Option<&'static IndexDescriptor> {
    SECONDARY_INDEXES
        .iter()
        .find(|index| index.index_name == Some(name))
}

/// Iterates over the primary index followed by every secondary index.
pub fn all_indexes() -> impl Iterator<Item = &'static IndexDescriptor> {
    std::iter::once(&PRIMARY_INDEX).chain(SECONDARY_INDEXES.iter())
}

/// Returns true if `attribute` is a partition or sort key of any index.
pub fn is_key_attribute(attribute: &str) -> bool {
    all_indexes().any(|index| {
        index.partition_key_name == attribute || index.sort_key_name == attribute
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_index_names() {
        let primary = primary_index();
        assert_eq!(primary.partition_key_name, "PKEY");
        assert_eq!(primary.sort_key_name, "SKEY");
        assert!(primary.is_primary());
        assert_eq!(primary.display_name(), "primary");
    }

    #[test]
    fn test_secondary_index_names() {
        let first = secondary_index(1).unwrap();
        assert_eq!(first.partition_key_name, "GSI1PKEY");
        assert_eq!(first.sort_key_name, "GSI1SKEY");
        assert_eq!(first.index_name, Some("GSI1"));
        assert!(!first.is_primary());

        let last = secondary_index(20).unwrap();
        assert_eq!(last.partition_key_name, "GSI20PKEY");
        assert_eq!(last.sort_key_name, "GSI20SKEY");
        assert_eq!(last.index_name, Some("GSI20"));
    }

    #[test]
    fn test_secondary_index_out_of_range() {
        assert!(secondary_index(0).is_none());
        assert!(secondary_index(21).is_none());
    }

    #[test]
    fn test_index_by_name() {
        assert_eq!(index_by_name("GSI7"), secondary_index(7));
        assert!(index_by_name("GSI21").is_none());
        assert!(index_by_name("primary").is_none());
    }

    #[test]
    fn test_all_indexes() {
        let indexes: Vec<_> = all_indexes().collect();
        assert_eq!(indexes.len(), 21);
        assert!(indexes[0].is_primary());
        assert_eq!(indexes[20].index_name, Some("GSI20"));
    }

    #[test]
    fn test_is_key_attribute() {
        assert!(is_key_attribute("PKEY"));
        assert!(is_key_attribute("SKEY"));
        assert!(is_key_attribute("GSI13PKEY"));
        assert!(is_key_attribute("GSI20SKEY"));
        assert!(!is_key_attribute("GSI21PKEY"));
        assert!(!is_key_attribute("email"));
    }
}
