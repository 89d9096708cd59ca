mod attribute;
mod error;
mod http_mapping;
mod traits;
mod types;

pub use attribute::{AttributeValue, Record};
pub use error::{RepositoryError, Result, StoreError, StoreResult};
pub use http_mapping::repository_error_to_status_code;
pub use traits::KeyValueStore;
pub use types::{
    is_reserved_attribute, ExistenceCheck, FieldChange, FieldChanges, PaginationToken,
    PrimaryKey, PutCondition, QueryOutput, QueryPage, QueryRequest, SortDirection,
    SortKeyCondition, SortKeyMatch, UpdateRequest, VersionCondition, DATA_ATTRIBUTE,
    OBJECT_VERSION_ATTRIBUTE,
};
