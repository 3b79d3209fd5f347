//! Transport session and delivery retry configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::env_or;

/// Transport session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Transport provider ("mock", "http-gateway")
    pub provider: String,

    /// Base URL of the messaging gateway
    #[serde(default)]
    pub gateway_url: Option<String>,

    /// Bearer token shared with the messaging gateway
    #[serde(default)]
    pub gateway_token: Option<String>,

    /// Seconds of `Ready` uptime before a proactive restart
    pub restart_interval_secs: u64,

    /// Seconds to wait after a session loss before re-authenticating
    pub reconnect_delay_secs: u64,

    /// Seconds allowed for reaching `Ready` after initialisation starts
    pub auth_timeout_secs: u64,

    /// Upper bound for a best-effort teardown
    pub teardown_timeout_secs: u64,

    /// Timeout for a single gateway request
    pub request_timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            gateway_url: None,
            gateway_token: None,
            restart_interval_secs: 2 * 60 * 60,
            reconnect_delay_secs: 5,
            auth_timeout_secs: 120,
            teardown_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

impl TransportConfig {
    /// Load from `TRANSPORT_*` variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env::var("TRANSPORT_PROVIDER").unwrap_or(defaults.provider),
            gateway_url: env::var("TRANSPORT_GATEWAY_URL").ok(),
            gateway_token: env::var("TRANSPORT_GATEWAY_TOKEN").ok().filter(|t| !t.is_empty()),
            restart_interval_secs: env_or(
                "TRANSPORT_RESTART_INTERVAL_SECS",
                defaults.restart_interval_secs,
            ),
            reconnect_delay_secs: env_or(
                "TRANSPORT_RECONNECT_DELAY_SECS",
                defaults.reconnect_delay_secs,
            ),
            auth_timeout_secs: env_or("TRANSPORT_AUTH_TIMEOUT_SECS", defaults.auth_timeout_secs),
            teardown_timeout_secs: env_or(
                "TRANSPORT_TEARDOWN_TIMEOUT_SECS",
                defaults.teardown_timeout_secs,
            ),
            request_timeout_secs: env_or(
                "TRANSPORT_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
        }
    }

    pub fn restart_interval(&self) -> Duration {
        Duration::from_secs(self.restart_interval_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    pub fn teardown_timeout(&self) -> Duration {
        Duration::from_secs(self.teardown_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Bounded send retry policy for the delivery orchestrator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Total send attempts per issuance
    pub max_attempts: u32,

    /// Seconds to wait for `Ready` after forcing a reconnect
    pub ready_wait_secs: u64,

    /// Pause after a transient send failure
    pub retry_delay_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            ready_wait_secs: 5,
            retry_delay_ms: 1000,
        }
    }
}

impl DeliveryConfig {
    /// Load from `DELIVERY_*` variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: env_or("DELIVERY_MAX_ATTEMPTS", defaults.max_attempts).max(1),
            ready_wait_secs: env_or("DELIVERY_READY_WAIT_SECS", defaults.ready_wait_secs),
            retry_delay_ms: env_or("DELIVERY_RETRY_DELAY_MS", defaults.retry_delay_ms),
        }
    }

    pub fn ready_wait(&self) -> Duration {
        Duration::from_secs(self.ready_wait_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
