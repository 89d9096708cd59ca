//! Backoff schedule for optimistic-concurrency retries (Functional Core).

use std::time::Duration;

use rand::Rng;

/// Default number of attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default exponential base, in milliseconds.
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 2;

/// Default jitter bounds, in milliseconds.
pub const DEFAULT_JITTER_MIN_MS: u64 = 10;
pub const DEFAULT_JITTER_MAX_MS: u64 = 200;

/// Bounded retry with exponential backoff and uniform jitter.
///
/// The delay after failed attempt `n` (0-based) is
/// `backoff_base_ms^(n + 1) + uniform(jitter_min_ms..=jitter_max_ms)` milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub jitter_min_ms: u64,
    pub jitter_max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            jitter_min_ms: DEFAULT_JITTER_MIN_MS,
            jitter_max_ms: DEFAULT_JITTER_MAX_MS,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries immediately, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff_base_ms: 0,
            jitter_min_ms: 0,
            jitter_max_ms: 0,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Returns true if another attempt may follow failed attempt `attempt` (0-based).
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt.saturating_add(1) < self.max_attempts
    }

    /// Deterministic part of the delay after failed attempt `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_add(1);
        Duration::from_millis(self.backoff_base_ms.saturating_pow(exponent))
    }

    /// Full delay after failed attempt `attempt`, jitter included.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let low = self.jitter_min_ms.min(self.jitter_max_ms);
        let high = self.jitter_min_ms.max(self.jitter_max_ms);
        let jitter = rand::rng().random_range(low..=high);
        self.backoff(attempt)
            .saturating_add(Duration::from_millis(jitter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.backoff_base_ms, 2);
        assert_eq!(policy.jitter_min_ms, 10);
        assert_eq!(policy.jitter_max_ms, 200);
    }

    #[test]
    fn test_backoff_is_exponential() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(2));
        assert_eq!(policy.backoff(1), Duration::from_millis(4));
        assert_eq!(policy.backoff(9), Duration::from_millis(1024));
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy {
            backoff_base_ms: 10,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(100), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_delay_stays_within_jitter_bounds() {
        let policy = RetryPolicy::default();
        for attempt in 0..5 {
            let base = policy.backoff(attempt);
            for _ in 0..50 {
                let delay = policy.delay_for(attempt);
                assert!(delay >= base + Duration::from_millis(10));
                assert!(delay <= base + Duration::from_millis(200));
            }
        }
    }

    #[test]
    fn test_inverted_jitter_bounds_are_tolerated() {
        let policy = RetryPolicy {
            jitter_min_ms: 50,
            jitter_max_ms: 5,
            ..RetryPolicy::default()
        };
        let delay = policy.delay_for(0);
        assert!(delay >= Duration::from_millis(7));
        assert!(delay <= Duration::from_millis(52));
    }

    #[test]
    fn test_should_retry_counts_attempts() {
        let policy = RetryPolicy::default().with_max_attempts(3);
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(1));
        assert!(!policy.should_retry(2));

        let single = RetryPolicy::immediate(1);
        assert!(!single.should_retry(0));
    }

    #[test]
    fn test_immediate_policy_has_no_delay() {
        let policy = RetryPolicy::immediate(5);
        assert_eq!(policy.delay_for(3), Duration::ZERO);
    }
}
