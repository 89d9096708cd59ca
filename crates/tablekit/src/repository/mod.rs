//! Generic single-table repository (Imperative Shell).
//!
//! [`Repository`] turns entity-level calls into requests against a
//! [`KeyValueStore`](tablekit_core::storage::KeyValueStore). Everything it
//! needs to know about one entity type comes from its
//! [`EntitySchema`](tablekit_core::entity::EntitySchema) and
//! [`Serializer`](tablekit_core::serializer::Serializer).
//!
//! # Example
//!
//! ```rust,ignore
//! let repo = Repository::new(store, "tablekit", JsonSerializer::new(), account_schema());
//!
//! let key = repo.create(&account, ExistenceCheck::Composite).await?;
//! let account = repo
//!     .update(&key, FieldChanges::new().set("credits", 30u64))
//!     .await?;
//! ```

mod crud;
mod options;
mod retry;
mod update;


pub use crud::Repository;
pub use options::{CompositeKeyQuery, SaveOptions};
