//! Mock Transport Implementation
//!
//! Logs outbound messages instead of sending them. Becomes ready as soon as
//! it is initialised, so a development server works without any messaging
//! account.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use otp_core::errors::TransportError;
use otp_core::services::transport::{EventSink, Transport};
use otp_shared::recipient::mask_recipient;

/// Console transport for development
#[derive(Clone)]
pub struct MockTransport {
    events: EventSink,
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to print message bodies
    console_output: bool,
}

impl MockTransport {
    pub fn new(events: EventSink) -> Self {
        Self {
            events,
            message_count: Arc::new(AtomicU64::new(0)),
            console_output: true,
        }
    }

    /// Create a mock transport that does not log message bodies
    pub fn quiet(events: EventSink) -> Self {
        Self {
            console_output: false,
            ..Self::new(events)
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn initialize(&self) -> Result<(), TransportError> {
        info!("Mock transport initialised");
        self.events.ready();
        Ok(())
    }

    async fn destroy(&self) -> Result<(), TransportError> {
        info!(
            messages_sent = self.get_message_count(),
            "Mock transport destroyed"
        );
        Ok(())
    }

    async fn send_message(&self, recipient_key: &str, text: &str) -> Result<(), TransportError> {
        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            info!(
                recipient = %mask_recipient(recipient_key),
                message_id = %message_id,
                count,
                body = text,
                "[MOCK] Message sent"
            );
        } else {
            info!(
                recipient = %mask_recipient(recipient_key),
                message_id = %message_id,
                count,
                "[MOCK] Message sent"
            );
        }
        Ok(())
    }
}
