use std::env;

use tablekit_core::retry::{
    RetryPolicy, DEFAULT_BACKOFF_BASE_MS, DEFAULT_JITTER_MAX_MS, DEFAULT_JITTER_MIN_MS,
    DEFAULT_MAX_ATTEMPTS,
};

/// Repository configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the shared table (default: "tablekit")
    pub table_name: String,
    /// Custom DynamoDB endpoint, e.g. a local DynamoDB (default: none)
    /// Note: Only used when the `dynamodb` feature is enabled.
    pub endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Attempts per update before giving up (default: 10)
    pub retry_max_attempts: u32,
    /// Exponential backoff base in milliseconds (default: 2)
    pub retry_backoff_base_ms: u64,
    /// Lower jitter bound in milliseconds (default: 10)
    pub retry_jitter_min_ms: u64,
    /// Upper jitter bound in milliseconds (default: 200)
    pub retry_jitter_max_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TABLEKIT_TABLE_NAME` - Table name (default: "tablekit")
    /// - `AWS_ENDPOINT_URL` - Custom DynamoDB endpoint (default: none)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `TABLEKIT_RETRY_MAX_ATTEMPTS` - Update attempts (default: 10)
    /// - `TABLEKIT_RETRY_BACKOFF_BASE_MS` - Backoff base (default: 2)
    /// - `TABLEKIT_RETRY_JITTER_MIN_MS` - Lower jitter bound (default: 10)
    /// - `TABLEKIT_RETRY_JITTER_MAX_MS` - Upper jitter bound (default: 200)
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            table_name: env::var("TABLEKIT_TABLE_NAME").unwrap_or_else(|_| "tablekit".to_string()),
            endpoint_url: env::var("AWS_ENDPOINT_URL").ok(),
            region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            retry_max_attempts: parse_env("TABLEKIT_RETRY_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
            retry_backoff_base_ms: parse_env(
                "TABLEKIT_RETRY_BACKOFF_BASE_MS",
                DEFAULT_BACKOFF_BASE_MS,
            ),
            retry_jitter_min_ms: parse_env("TABLEKIT_RETRY_JITTER_MIN_MS", DEFAULT_JITTER_MIN_MS),
            retry_jitter_max_ms: parse_env("TABLEKIT_RETRY_JITTER_MAX_MS", DEFAULT_JITTER_MAX_MS),
        }
    }

    /// Retry policy for optimistic-concurrency updates.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            backoff_base_ms: self.retry_backoff_base_ms,
            jitter_min_ms: self.retry_jitter_min_ms,
            jitter_max_ms: self.retry_jitter_max_ms,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_conversion() {
        let config = Config {
            table_name: "accounts".to_string(),
            endpoint_url: None,
            region: "eu-west-1".to_string(),
            retry_max_attempts: 4,
            retry_backoff_base_ms: 3,
            retry_jitter_min_ms: 1,
            retry_jitter_max_ms: 5,
        };

        assert_eq!(
            config.retry_policy(),
            RetryPolicy {
                max_attempts: 4,
                backoff_base_ms: 3,
                jitter_min_ms: 1,
                jitter_max_ms: 5,
            }
        );
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("TABLEKIT_TABLE_NAME");
        env::remove_var("AWS_ENDPOINT_URL");
        env::remove_var("AWS_REGION");
        env::remove_var("TABLEKIT_RETRY_MAX_ATTEMPTS");
        env::remove_var("TABLEKIT_RETRY_BACKOFF_BASE_MS");
        env::remove_var("TABLEKIT_RETRY_JITTER_MIN_MS");
        env::remove_var("TABLEKIT_RETRY_JITTER_MAX_MS");

        let config = Config::from_env();

        assert_eq!(config.table_name, "tablekit");
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }
}
