//! # Infrastructure Layer
//!
//! Concrete implementations of the seams defined in `otp_core`:
//!
//! - **Transport**: messaging transports the session manager drives
//!   (a console transport for development, an HTTP messaging gateway)
//! - **Notify**: post-verification notifiers (log only, HTTP callback)
//!
//! Both are selected from configuration by the `create_*` factories.

pub mod notify;
pub mod transport;

pub use notify::create_notifier;
pub use transport::create_transport;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP client error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport setup error
    #[error("Transport error: {0}")]
    Transport(String),
}
