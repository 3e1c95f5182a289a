use std::time::Duration;

use super::ClientError;

/// Retry rule for read queries. Writes are never retried.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    max_failures: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_failures: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// `failure_count` is the number of failed attempts so far, including
    /// the one that produced `err`.
    pub fn should_retry(&self, failure_count: u32, err: &ClientError) -> bool {
        failure_count < self.max_failures && err.is_transient()
    }

    pub fn delay(&self, failure_count: u32) -> Duration {
        self.base_delay * failure_count
    }
}
