//! Error types for transport delivery and code verification
//!
//! `SessionLost` never reaches API callers; the session manager consumes it
//! and schedules a reconnect. Everything else maps to a caller-visible status.

use thiserror::Error;

/// Failure reported by a messaging transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The underlying session is gone and must be re-established
    #[error("Transport session lost: {reason}")]
    SessionLost { reason: String },

    /// The request failed but the session is still usable
    #[error("Transient transport failure: {reason}")]
    Transient { reason: String },
}

impl TransportError {
    pub fn session_lost(reason: impl Into<String>) -> Self {
        TransportError::SessionLost { reason: reason.into() }
    }

    pub fn transient(reason: impl Into<String>) -> Self {
        TransportError::Transient { reason: reason.into() }
    }

    /// Whether this failure invalidates the session
    pub fn is_session_lost(&self) -> bool {
        matches!(self, TransportError::SessionLost { .. })
    }
}

/// Failure to deliver a freshly issued code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The session never became ready within the retry budget
    #[error("Transport unavailable after {attempts} attempts")]
    TransportUnavailable { attempts: u32 },

    /// The session was ready but every send attempt failed
    #[error("Delivery failed after {attempts} attempts: {reason}")]
    DeliveryFailed { attempts: u32, reason: String },
}

/// Failure of an API-submitted verification
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Invalid OTP or expired")]
    InvalidOrExpired,
}
