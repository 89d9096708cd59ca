//! Core types and pure functions for the tablekit single-table repository.
//!
//! Nothing in this crate performs I/O. The store backends and the generic
//! repository live in the `tablekit` crate.

pub mod entity;
pub mod index;
pub mod keys;
pub mod retry;
pub mod serializer;
pub mod storage;
