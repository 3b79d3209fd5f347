//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use otp_core::services::transport::EventSink;
use otp_core::{DeliveryOrchestrator, SessionManager, VerificationEngine};

/// Services the handlers call into, built once at startup
pub struct AppState {
    pub delivery: Arc<DeliveryOrchestrator>,
    pub verification: Arc<VerificationEngine>,
    pub session: Arc<SessionManager>,
    /// Feeds pushed gateway events into the session manager
    pub events: EventSink,
    /// Suffix appended to bare phone numbers
    pub recipient_suffix: String,
    pub otp_ttl: Duration,
    /// Bearer token the transport webhook must present, if any
    pub gateway_token: Option<String>,
}
