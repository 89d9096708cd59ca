use crate::storage::{Record, Result};

/// Maps an entity to and from the store's attribute representation.
///
/// One serializer is constructed per entity type and handed to the repository.
/// `to_record`/`from_record` are used for normalized records (one attribute
/// per field); `serialize_to_string`/`deserialize_from_string` for denormalized
/// records, where the whole entity lives in a single attribute.
pub trait Serializer<T>: Send + Sync {
    /// Converts an entity into one attribute per field.
    fn to_record(&self, entity: &T) -> Result<Record>;

    /// Rebuilds an entity from a stored record. Key attributes may be present
    /// and should be ignored.
    fn from_record(&self, record: &Record) -> Result<T>;

    /// Serializes the whole entity into a string.
    fn serialize_to_string(&self, entity: &T) -> Result<String>;

    /// Inverse of [`Serializer::serialize_to_string`].
    fn deserialize_from_string(&self, data: &str) -> Result<T>;
}
