//! Messaging transport module
//!
//! Transports the session manager can drive:
//!
//! - **Mock**: logs outbound messages instead of sending them (development)
//! - **HTTP gateway**: drives an external messaging bridge over a small JSON
//!   protocol; the bridge pushes its events back through the API webhook
//!
//! Recipient addresses are masked in every log line.

use std::sync::Arc;

use otp_core::services::transport::{EventSink, Transport};
use otp_shared::config::TransportConfig;

pub mod http_gateway;
pub mod mock;

pub use http_gateway::{HttpGatewayConfig, HttpGatewayTransport};
pub use mock::MockTransport;

use crate::InfrastructureError;

/// Provider name selecting the HTTP gateway transport
pub const GATEWAY_PROVIDER: &str = "http-gateway";

#[cfg(test)]
mod tests;

/// Create a transport based on configuration
///
/// `events` is the sink the transport reports readiness, session loss and
/// inbound messages into. An unknown provider falls back to the mock
/// transport; a gateway without a URL or token is a configuration error.
pub fn create_transport(
    config: &TransportConfig,
    events: EventSink,
) -> Result<Arc<dyn Transport>, InfrastructureError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockTransport::new(events))),
        GATEWAY_PROVIDER => {
            let gateway_config = HttpGatewayConfig::try_from(config)?;
            Ok(Arc::new(HttpGatewayTransport::new(gateway_config, events)?))
        }
        other => {
            tracing::warn!(
                "Unknown transport provider '{}', using mock implementation",
                other
            );
            Ok(Arc::new(MockTransport::new(events)))
        }
    }
}
