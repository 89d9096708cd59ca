//! In-memory storage backend for testing.
//!
//! Stores every table in a `BTreeMap` wrapped in `Arc<RwLock<_>>`. Useful for
//! tests and local development where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use tablekit::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! // Hand `Arc::new(store)` to a Repository...
//! ```

mod store;

pub use store::InMemoryStore;
