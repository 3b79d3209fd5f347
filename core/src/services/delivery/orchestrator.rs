//! Delivery orchestrator implementation

use std::sync::Arc;
use std::time::Duration;

use otp_shared::config::OtpConfig;
use otp_shared::recipient::mask_recipient;
use tracing::{debug, info, warn};

use crate::domain::entities::challenge::Challenge;
use crate::errors::{DeliveryError, TransportError};
use crate::services::challenge::ChallengeStore;
use crate::services::session::SessionManager;

use super::policy::RetryPolicy;

/// Why the most recent attempt did not deliver
enum AttemptFailure {
    NotReady,
    Send(String),
}

/// Coordinates challenge issuance with transport delivery.
///
/// Holds no per-recipient state; retry counters live for one call.
pub struct DeliveryOrchestrator {
    store: Arc<ChallengeStore>,
    session: Arc<SessionManager>,
    otp: OtpConfig,
    policy: RetryPolicy,
}

impl DeliveryOrchestrator {
    pub fn new(
        store: Arc<ChallengeStore>,
        session: Arc<SessionManager>,
        otp: OtpConfig,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            store,
            session,
            otp,
            policy,
        }
    }

    /// Issue a challenge for `recipient_key` and deliver its code.
    ///
    /// Any earlier challenge for the recipient is replaced. If every attempt
    /// fails, the new challenge is discarded before the error is returned.
    pub async fn issue_and_send(
        &self,
        recipient_key: &str,
        notify_target: Option<String>,
        ttl: Duration,
    ) -> Result<Challenge, DeliveryError> {
        let challenge = self.store.issue(recipient_key, notify_target, ttl).await;
        let text = self.otp.render_message(&challenge.secret, ttl);
        let masked = mask_recipient(recipient_key);
        let max_attempts = self.policy.max_attempts;

        let mut last_failure = AttemptFailure::NotReady;
        for attempt in 1..=max_attempts {
            if !self.session.is_ready() {
                debug!(recipient = %masked, attempt, "Transport not ready, forcing reconnect");
                if !self.session.reconnect_and_wait(self.policy.ready_wait).await {
                    warn!(
                        recipient = %masked,
                        attempt,
                        max_attempts,
                        phase = %self.session.phase(),
                        "Transport still not ready"
                    );
                    last_failure = AttemptFailure::NotReady;
                    continue;
                }
            }

            match self.session.send(recipient_key, &text).await {
                Ok(()) => {
                    info!(
                        recipient = %masked,
                        challenge_id = %challenge.id,
                        attempt,
                        event = "otp_sent",
                        "Verification code delivered"
                    );
                    return Ok(challenge);
                }
                Err(TransportError::SessionLost { reason }) => {
                    // The session manager has already moved to Disconnected;
                    // the next attempt forces the reconnect.
                    warn!(recipient = %masked, attempt, max_attempts, %reason, "Send lost the session");
                    last_failure = AttemptFailure::Send(reason);
                }
                Err(TransportError::Transient { reason }) => {
                    warn!(recipient = %masked, attempt, max_attempts, %reason, "Send failed");
                    last_failure = AttemptFailure::Send(reason);
                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.retry_delay).await;
                    }
                }
            }
        }

        self.store.discard(recipient_key, challenge.id).await;

        let err = match last_failure {
            AttemptFailure::NotReady => DeliveryError::TransportUnavailable {
                attempts: max_attempts,
            },
            AttemptFailure::Send(reason) => DeliveryError::DeliveryFailed {
                attempts: max_attempts,
                reason,
            },
        };
        warn!(
            recipient = %masked,
            challenge_id = %challenge.id,
            error = %err,
            event = "otp_delivery_failed",
            "Giving up on delivery"
        );
        Err(err)
    }
}
