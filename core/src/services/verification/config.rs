//! Configuration for the verification engine

use otp_shared::config::OtpConfig;

/// Reply texts sent back over the transport
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Sent when an inbound reply matches the challenge
    pub ack_message: String,
    /// Sent when an inbound reply does not match
    pub nack_message: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self::from(&OtpConfig::default())
    }
}

impl From<&OtpConfig> for VerificationConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            ack_message: config.ack_message.clone(),
            nack_message: config.nack_message.clone(),
        }
    }
}
