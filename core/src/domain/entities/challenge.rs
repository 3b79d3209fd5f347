//! Challenge entity: one outstanding OTP for one recipient.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the numeric secret
pub const CODE_LENGTH: usize = 6;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 1_000_000;

/// An outstanding OTP awaiting verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Identity of this issuance; replacements get a new id
    pub id: Uuid,

    /// Canonical transport address of the recipient
    pub recipient_key: String,

    /// The 6-digit code
    pub secret: String,

    /// When the challenge was issued
    pub created_at: DateTime<Utc>,

    /// The challenge is not honoured at or after this instant
    pub expires_at: DateTime<Utc>,

    /// Opaque reference handed to the post-verification notifier
    pub notify_target: Option<String>,
}

impl Challenge {
    /// Creates a challenge with a fresh secret, valid for `ttl` from `now`
    pub fn new(
        recipient_key: impl Into<String>,
        notify_target: Option<String>,
        ttl: std::time::Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_key: recipient_key.into(),
            secret: Self::generate_secret(),
            created_at: now,
            expires_at: now
                .checked_add_signed(to_chrono(ttl))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            notify_target,
        }
    }

    /// Draws a 6-digit code uniformly from the OS CSPRNG
    pub fn generate_secret() -> String {
        let code: u32 = OsRng.gen_range(CODE_MIN..CODE_MAX);
        code.to_string()
    }

    /// Regenerates the secret until it differs from `previous`
    pub(crate) fn ensure_secret_differs(&mut self, previous: &str) {
        while constant_time_eq(self.secret.as_bytes(), previous.as_bytes()) {
            self.secret = Self::generate_secret();
        }
    }

    /// True once `now` has reached the deadline
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Constant-time comparison against a submitted code
    pub fn matches(&self, submitted: &str) -> bool {
        let submitted = submitted.trim();
        submitted.len() == self.secret.len()
            && constant_time_eq(self.secret.as_bytes(), submitted.as_bytes())
    }

    /// Time left before expiry, zero once expired
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

fn to_chrono(ttl: std::time::Duration) -> Duration {
    Duration::milliseconds(ttl.as_millis().min(i64::MAX as u128) as i64)
}
