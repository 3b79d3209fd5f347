//! Verification engine module
//!
//! Checks submitted codes against outstanding challenges:
//! - Inbound transport replies, answered with an ack or nack message
//! - API-submitted codes, answered with a plain result
//! - Best-effort notification after a successful inbound verification

mod config;
mod engine;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use engine::VerificationEngine;
pub use traits::VerificationNotifier;
pub use types::{InboundOutcome, VerificationNotice};
