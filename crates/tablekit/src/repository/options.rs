//! Call options for save and query.

use tablekit_core::index::{IndexAttributes, IndexDescriptor, PRIMARY_INDEX};
use tablekit_core::storage::{ExistenceCheck, PaginationToken, SortDirection, SortKeyCondition};

/// How a record is written by [`Repository::save`](super::Repository::save).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    pub existence_check: ExistenceCheck,
    /// Secondary index entries written next to the primary key.
    pub index_attributes: IndexAttributes,
    /// Store the entity as one serialized `data` attribute instead of one
    /// attribute per field.
    pub denormalize: bool,
}

impl SaveOptions {
    pub fn new(existence_check: ExistenceCheck) -> Self {
        Self {
            existence_check,
            ..Self::default()
        }
    }

    pub fn with_index_attributes(mut self, index_attributes: IndexAttributes) -> Self {
        self.index_attributes = index_attributes;
        self
    }

    pub fn denormalized(mut self) -> Self {
        self.denormalize = true;
        self
    }
}

/// A paged query over one partition of an index.
///
/// ```rust,ignore
/// let query = CompositeKeyQuery::new("USER!!42")
///     .sort_key(SortKeyCondition::begins_with("ORDER!!"))
///     .limit(25)
///     .descending();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeKeyQuery {
    pub partition_key: String,
    pub sort_key: Option<SortKeyCondition>,
    pub index: IndexDescriptor,
    pub limit: Option<u32>,
    pub direction: SortDirection,
    pub pagination_token: Option<PaginationToken>,
}

impl CompositeKeyQuery {
    /// Queries the primary index, ascending, without a limit.
    pub fn new(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: None,
            index: PRIMARY_INDEX,
            limit: None,
            direction: SortDirection::Ascending,
            pagination_token: None,
        }
    }

    pub fn sort_key(mut self, condition: SortKeyCondition) -> Self {
        self.sort_key = Some(condition);
        self
    }

    pub fn index(mut self, index: &IndexDescriptor) -> Self {
        self.index = *index;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn descending(mut self) -> Self {
        self.direction = SortDirection::Descending;
        self
    }

    /// Continues after the page that returned `token`.
    pub fn after(mut self, token: PaginationToken) -> Self {
        self.pagination_token = Some(token);
        self
    }
}
