//! Configuration module with service-specific sub-modules
//!
//! - `environment` - Environment detection and logging configuration
//! - `notify` - Post-verification callback delivery
//! - `otp` - Challenge lifetime and message texts
//! - `server` - HTTP server and CORS configuration
//! - `transport` - Transport session timings and delivery retry policy

pub mod environment;
pub mod notify;
pub mod otp;
pub mod server;
pub mod transport;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use notify::NotifyConfig;
pub use otp::OtpConfig;
pub use server::{CorsConfig, ServerConfig};
pub use transport::{DeliveryConfig, TransportConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub otp: OtpConfig,
    pub transport: TransportConfig,
    pub delivery: DeliveryConfig,
    pub notify: NotifyConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment and an optional `.env`
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            otp: OtpConfig::from_env(),
            transport: TransportConfig::from_env(),
            delivery: DeliveryConfig::from_env(),
            notify: NotifyConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset or malformed
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
