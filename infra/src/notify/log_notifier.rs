//! Notifier that only logs

use async_trait::async_trait;
use tracing::info;

use otp_core::services::verification::{VerificationNotice, VerificationNotifier};
use otp_shared::recipient::mask_recipient;

/// Logs each verification instead of calling out
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl VerificationNotifier for LogNotifier {
    async fn notify_verified(&self, notice: &VerificationNotice) -> Result<(), String> {
        info!(
            recipient = %mask_recipient(&notice.recipient_key),
            target = %notice.notify_target,
            verified_at = %notice.verified_at,
            "[LOG] Verification notice"
        );
        Ok(())
    }
}
