//! Shared utilities and common types for the OtpRelay server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Recipient address canonicalisation and log masking

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CorsConfig, DeliveryConfig, Environment, LogFormat, LoggingConfig, NotifyConfig,
    OtpConfig, ServerConfig, TransportConfig,
};
pub use utils::recipient;
