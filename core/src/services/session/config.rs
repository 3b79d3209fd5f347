//! Configuration for the session manager

use std::time::Duration;

use otp_shared::config::TransportConfig;

/// Timings for the session lifecycle
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// `Ready` uptime before a proactive restart
    pub restart_interval: Duration,
    /// Delay between a session loss and the next authentication attempt
    pub reconnect_delay: Duration,
    /// How long `Authenticating` may last before it counts as a failure
    pub auth_timeout: Duration,
    /// Upper bound on a teardown call
    pub teardown_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&TransportConfig::default())
    }
}

impl From<&TransportConfig> for SessionConfig {
    fn from(config: &TransportConfig) -> Self {
        Self {
            restart_interval: config.restart_interval(),
            reconnect_delay: config.reconnect_delay(),
            auth_timeout: config.auth_timeout(),
            teardown_timeout: config.teardown_timeout(),
        }
    }
}
