//! Retry policy for a single delivery request

use std::time::Duration;

use otp_shared::config::DeliveryConfig;

/// Bounds on one `issue_and_send` call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total send attempts, including the first
    pub max_attempts: u32,
    /// Wait for `Ready` after forcing a reconnect
    pub ready_wait: Duration,
    /// Pause after a transient send failure
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&DeliveryConfig::default())
    }
}

impl From<&DeliveryConfig> for RetryPolicy {
    fn from(config: &DeliveryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            ready_wait: config.ready_wait(),
            retry_delay: config.retry_delay(),
        }
    }
}
