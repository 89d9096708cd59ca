//! Retry schedule for updates that lose an optimistic-concurrency race.

mod policy;

pub use policy::{
    RetryPolicy, DEFAULT_BACKOFF_BASE_MS, DEFAULT_JITTER_MAX_MS, DEFAULT_JITTER_MIN_MS,
    DEFAULT_MAX_ATTEMPTS,
};
