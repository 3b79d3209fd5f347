//! HTTP route handlers
//!
//! - OTP issuance and verification
//! - Session status and health
//! - Transport event webhook

pub mod otp;
pub mod status;
pub mod transport_events;
