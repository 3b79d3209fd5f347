//! Types for verification results and notices

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What happened to an inbound reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Matched a live challenge; ack sent
    Verified,
    /// A challenge is live but the text did not match; nack sent
    Rejected,
    /// No live challenge for the sender; nothing sent
    Ignored,
}

/// Payload handed to the notifier after a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationNotice {
    pub recipient_key: String,
    /// Opaque target taken from the challenge
    #[serde(skip)]
    pub notify_target: String,
    pub verified_at: DateTime<Utc>,
}
