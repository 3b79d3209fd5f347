//! Transport events and the channel that carries them

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Something the transport observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportEvent {
    /// The session is authenticated and can send
    Ready,
    /// The session dropped
    SessionLost { reason: String },
    /// A message arrived from a party
    #[serde(rename = "message", rename_all = "camelCase")]
    InboundMessage { recipient_key: String, text: String },
}

/// Receiving half, consumed by the session manager
pub type EventStream = mpsc::UnboundedReceiver<TransportEvent>;

/// Sending half handed to a transport implementation
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<TransportEvent>,
}

/// Create a connected sink/stream pair
pub fn event_channel() -> (EventSink, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx }, rx)
}

impl EventSink {
    /// Push an event; returns false once the session manager has gone away
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn ready(&self) -> bool {
        self.emit(TransportEvent::Ready)
    }

    pub fn session_lost(&self, reason: impl Into<String>) -> bool {
        self.emit(TransportEvent::SessionLost { reason: reason.into() })
    }

    pub fn inbound(&self, recipient_key: impl Into<String>, text: impl Into<String>) -> bool {
        self.emit(TransportEvent::InboundMessage {
            recipient_key: recipient_key.into(),
            text: text.into(),
        })
    }
}
