//! Physical index layout shared by every entity type.

mod attributes;
mod registry;

pub use attributes::{IndexAttribute, IndexAttributes};
pub use registry::{
    all_indexes, index_by_name, is_key_attribute, primary_index, secondary_index,
    IndexDescriptor, PRIMARY_INDEX, PRIMARY_PARTITION_KEY, PRIMARY_SORT_KEY,
    SECONDARY_INDEXES, SECONDARY_INDEX_COUNT,
};
