//! Single-table repository layer over a remote key-value store.
//!
//! The pure building blocks (key encoding, index registry, record model,
//! serializers, retry schedule) live in [`tablekit_core`]; this crate adds the
//! store backends and the generic [`Repository`].

pub mod config;
pub mod repository;
pub mod storage;

pub use config::Config;
pub use repository::{CompositeKeyQuery, Repository, SaveOptions};
pub use tablekit_core;
