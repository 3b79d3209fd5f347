//! Traits at the transport boundary

use async_trait::async_trait;

use crate::errors::TransportError;

/// A session-based messaging transport.
///
/// Implementations report readiness, session loss and inbound messages
/// through the `EventSink` they were constructed with; these methods only
/// drive the session.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Begin establishing a session. Readiness is signalled by an event,
    /// not by this call returning.
    async fn initialize(&self) -> Result<(), TransportError>;

    /// Tear the session down
    async fn destroy(&self) -> Result<(), TransportError>;

    /// Send a text message to a canonical recipient address
    async fn send_message(&self, recipient_key: &str, text: &str) -> Result<(), TransportError>;
}

/// Consumer of inbound messages delivered by the transport
#[async_trait]
pub trait InboundHandler: Send + Sync {
    async fn handle_inbound(&self, recipient_key: &str, text: &str);
}
