//! Verification engine implementation

use std::sync::Arc;

use async_trait::async_trait;
use otp_shared::recipient::mask_recipient;
use tracing::{debug, info, warn};

use crate::domain::clock::Clock;
use crate::domain::entities::challenge::Challenge;
use crate::errors::VerifyError;
use crate::services::challenge::{ChallengeStore, ConsumeResult};
use crate::services::session::SessionManager;
use crate::services::transport::InboundHandler;

use super::config::VerificationConfig;
use super::traits::VerificationNotifier;
use super::types::{InboundOutcome, VerificationNotice};

/// Applies submitted codes to the challenge store
pub struct VerificationEngine {
    store: Arc<ChallengeStore>,
    session: Arc<SessionManager>,
    notifier: Arc<dyn VerificationNotifier>,
    clock: Arc<dyn Clock>,
    config: VerificationConfig,
}

impl VerificationEngine {
    pub fn new(
        store: Arc<ChallengeStore>,
        session: Arc<SessionManager>,
        notifier: Arc<dyn VerificationNotifier>,
        clock: Arc<dyn Clock>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            store,
            session,
            notifier,
            clock,
            config,
        }
    }

    /// Handle a reply that arrived over the transport.
    ///
    /// A match is acknowledged and notified, a mismatch gets a negative
    /// reply, and a sender with no live challenge gets nothing.
    pub async fn verify_inbound(&self, recipient_key: &str, received_text: &str) -> InboundOutcome {
        let masked = mask_recipient(recipient_key);
        let result = self.store.try_consume(recipient_key, received_text).await;
        debug!(recipient = %masked, result = result.label(), "Inbound reply checked");

        match result {
            ConsumeResult::Matched(challenge) => {
                info!(
                    recipient = %masked,
                    challenge_id = %challenge.id,
                    channel = "transport",
                    event = "otp_verified_success",
                    "Verification code verified"
                );
                self.reply(recipient_key, &self.config.ack_message).await;
                self.spawn_notification(challenge);
                InboundOutcome::Verified
            }
            ConsumeResult::Mismatch => {
                warn!(
                    recipient = %masked,
                    channel = "transport",
                    event = "otp_verification_failed",
                    "Inbound reply did not match"
                );
                self.reply(recipient_key, &self.config.nack_message).await;
                InboundOutcome::Rejected
            }
            ConsumeResult::NotFound | ConsumeResult::Expired => InboundOutcome::Ignored,
        }
    }

    /// Check an API-submitted code; no reply is sent and nothing is notified
    pub async fn verify_explicit(
        &self,
        recipient_key: &str,
        submitted_code: &str,
    ) -> Result<(), VerifyError> {
        let masked = mask_recipient(recipient_key);
        match self.store.try_consume(recipient_key, submitted_code).await {
            ConsumeResult::Matched(challenge) => {
                info!(
                    recipient = %masked,
                    challenge_id = %challenge.id,
                    channel = "api",
                    event = "otp_verified_success",
                    "Verification code verified"
                );
                Ok(())
            }
            other => {
                warn!(
                    recipient = %masked,
                    result = other.label(),
                    channel = "api",
                    event = "otp_verification_failed",
                    "Verification code rejected"
                );
                Err(VerifyError::InvalidOrExpired)
            }
        }
    }

    async fn reply(&self, recipient_key: &str, text: &str) {
        if let Err(err) = self.session.send(recipient_key, text).await {
            warn!(
                recipient = %mask_recipient(recipient_key),
                error = %err,
                "Failed to send verification reply"
            );
        }
    }

    fn spawn_notification(&self, challenge: Challenge) {
        let Some(notify_target) = challenge.notify_target else {
            return;
        };
        let notice = VerificationNotice {
            recipient_key: challenge.recipient_key,
            notify_target,
            verified_at: self.clock.now(),
        };
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.notify_verified(&notice).await {
                warn!(
                    recipient = %mask_recipient(&notice.recipient_key),
                    error = %err,
                    event = "otp_notify_failed",
                    "Verification notification failed"
                );
            }
        });
    }
}

#[async_trait]
impl InboundHandler for VerificationEngine {
    async fn handle_inbound(&self, recipient_key: &str, text: &str) {
        self.verify_inbound(recipient_key, text).await;
    }
}
