//! OTP issuance and reply text configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::env_or;

/// Default challenge lifetime (5 minutes)
pub const DEFAULT_TTL_SECONDS: u64 = 300;

/// Longest accepted challenge lifetime (24 hours)
pub const MAX_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Default suffix appended to bare phone numbers
pub const DEFAULT_RECIPIENT_SUFFIX: &str = "@c.us";

/// OTP configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Seconds a challenge stays valid
    pub ttl_seconds: u64,

    /// Transport address suffix for bare numbers
    pub recipient_suffix: String,

    /// Outbound message; `{code}`, `{validity}` ("5 minutes") and the bare
    /// number `{minutes}` are substituted
    pub message_template: String,

    /// Reply sent when an inbound message matches the challenge
    pub ack_message: String,

    /// Reply sent when an inbound message does not match
    pub nack_message: String,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            recipient_suffix: DEFAULT_RECIPIENT_SUFFIX.to_string(),
            message_template: String::from(
                "Your verification code is: *{code}*\n\nValid for {validity}. Do not share this code with anyone.",
            ),
            ack_message: String::from("✅ OTP verified successfully!"),
            nack_message: String::from("❌ Invalid OTP. Please try again."),
        }
    }
}

impl OtpConfig {
    /// Load from `OTP_*` variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_seconds: match env_or("OTP_TTL_SECONDS", defaults.ttl_seconds) {
                0 => defaults.ttl_seconds,
                secs => secs.min(MAX_TTL_SECONDS),
            },
            recipient_suffix: env::var("OTP_RECIPIENT_SUFFIX").unwrap_or(defaults.recipient_suffix),
            message_template: env::var("OTP_MESSAGE_TEMPLATE").unwrap_or(defaults.message_template),
            ack_message: env::var("OTP_ACK_MESSAGE").unwrap_or(defaults.ack_message),
            nack_message: env::var("OTP_NACK_MESSAGE").unwrap_or(defaults.nack_message),
        }
    }

    /// Challenge lifetime, kept within 1 second and `MAX_TTL_SECONDS`
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds.clamp(1, MAX_TTL_SECONDS))
    }

    /// Render the outbound message for a code valid for `ttl`
    pub fn render_message(&self, code: &str, ttl: Duration) -> String {
        let secs = ttl.as_secs().max(1);
        self.message_template
            .replace("{code}", code)
            .replace("{validity}", &validity(secs))
            .replace("{minutes}", &secs.div_ceil(60).to_string())
    }
}

// Whole minutes when exact or at least two, otherwise seconds
fn validity(secs: u64) -> String {
    if secs < 120 && secs % 60 != 0 {
        plural(secs, "second")
    } else {
        plural(secs.div_ceil(60), "minute")
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
