//! In-memory challenge store implementation

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use otp_shared::recipient::mask_recipient;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::clock::Clock;
use crate::domain::entities::challenge::Challenge;

use super::types::ConsumeResult;

type Entries = Arc<Mutex<HashMap<String, Challenge>>>;

/// Outstanding challenges keyed by recipient.
///
/// Every read-modify-write happens under one lock, so an expiry firing and a
/// concurrent verification for the same recipient can never interleave.
pub struct ChallengeStore {
    entries: Entries,
    clock: Arc<dyn Clock>,
}

impl ChallengeStore {
    /// Create an empty store reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Issue a new challenge, replacing any live one for the recipient.
    ///
    /// Schedules removal at the deadline. The scheduled removal only deletes
    /// the entry if it is still this exact issuance.
    pub async fn issue(
        &self,
        recipient_key: &str,
        notify_target: Option<String>,
        ttl: Duration,
    ) -> Challenge {
        let mut challenge = Challenge::new(recipient_key, notify_target, ttl, self.clock.now());

        let replaced = {
            let mut entries = self.entries.lock().await;
            if let Some(previous) = entries.get(recipient_key) {
                challenge.ensure_secret_differs(&previous.secret);
            }
            entries.insert(recipient_key.to_string(), challenge.clone())
        };

        tracing::info!(
            recipient = %mask_recipient(recipient_key),
            challenge_id = %challenge.id,
            expires_at = %challenge.expires_at,
            replaced = replaced.is_some(),
            event = "otp_generated",
            "Issued new challenge"
        );

        self.schedule_expiry(recipient_key.to_string(), challenge.id, ttl);
        challenge
    }

    /// Check a submitted code and consume the challenge on a match.
    ///
    /// An entry found past its deadline is removed here as well, so the
    /// outcome does not depend on whether the scheduled expiry already ran.
    pub async fn try_consume(&self, recipient_key: &str, submitted_code: &str) -> ConsumeResult {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let result = match entries.get(recipient_key) {
            None => ConsumeResult::NotFound,
            Some(challenge) if challenge.is_expired_at(now) => {
                entries.remove(recipient_key);
                ConsumeResult::Expired
            }
            Some(challenge) if challenge.matches(submitted_code) => entries
                .remove(recipient_key)
                .map(ConsumeResult::Matched)
                .unwrap_or(ConsumeResult::NotFound),
            Some(_) => ConsumeResult::Mismatch,
        };
        drop(entries);

        tracing::debug!(
            recipient = %mask_recipient(recipient_key),
            outcome = result.label(),
            "Challenge consume attempt"
        );
        result
    }

    /// Remove a challenge only if it is still the given issuance.
    ///
    /// Returns whether anything was removed.
    pub async fn discard(&self, recipient_key: &str, challenge_id: Uuid) -> bool {
        remove_if_current(&self.entries, recipient_key, challenge_id).await
    }

    /// Snapshot of the live challenge for a recipient
    pub async fn get(&self, recipient_key: &str) -> Option<Challenge> {
        self.entries.lock().await.get(recipient_key).cloned()
    }

    /// Number of stored challenges, including expired ones not yet swept
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn schedule_expiry(&self, recipient_key: String, challenge_id: Uuid, ttl: Duration) {
        let entries = Arc::clone(&self.entries);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if remove_if_current(&entries, &recipient_key, challenge_id).await {
                tracing::info!(
                    recipient = %mask_recipient(&recipient_key),
                    challenge_id = %challenge_id,
                    event = "otp_expired",
                    "Challenge expired"
                );
            }
        });
    }
}

async fn remove_if_current(entries: &Entries, recipient_key: &str, challenge_id: Uuid) -> bool {
    let mut entries = entries.lock().await;
    match entries.get(recipient_key) {
        Some(current) if current.id == challenge_id => {
            entries.remove(recipient_key);
            true
        }
        _ => false,
    }
}
