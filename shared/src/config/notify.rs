//! Post-verification notification configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::env_or;

/// Notification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    /// Notification provider ("log", "http")
    pub provider: String,

    /// Timeout for a single callback request
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            provider: String::from("log"),
            timeout_secs: 10,
        }
    }
}

impl NotifyConfig {
    /// Load from `NOTIFY_PROVIDER` and `NOTIFY_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env::var("NOTIFY_PROVIDER").unwrap_or(defaults.provider),
            timeout_secs: env_or("NOTIFY_TIMEOUT_SECS", defaults.timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
