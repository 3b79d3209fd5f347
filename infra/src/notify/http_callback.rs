//! HTTP callback notifier
//!
//! POSTs `{"recipientKey", "verifiedAt"}` to the challenge's notify target.
//! One attempt, bounded by the configured timeout; the caller only logs a
//! failure.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use otp_core::services::verification::{VerificationNotice, VerificationNotifier};
use otp_shared::recipient::mask_recipient;

use crate::InfrastructureError;

/// Posts verification notices to callback URLs
pub struct HttpCallbackNotifier {
    client: Client,
}

impl HttpCallbackNotifier {
    pub fn new(timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl VerificationNotifier for HttpCallbackNotifier {
    async fn notify_verified(&self, notice: &VerificationNotice) -> Result<(), String> {
        let response = self
            .client
            .post(&notice.notify_target)
            .json(notice)
            .send()
            .await
            .map_err(|e| format!("callback request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("callback responded {}", status));
        }

        info!(
            recipient = %mask_recipient(&notice.recipient_key),
            %status,
            event = "otp_notify_sent",
            "Verification callback delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notice(target: &str) -> VerificationNotice {
        VerificationNotice {
            recipient_key: "15551234567@c.us".to_string(),
            notify_target: target.to_string(),
            verified_at: Utc::now(),
        }
    }

    #[test]
    fn test_notice_body_omits_target() {
        let body = serde_json::to_value(notice("https://example.test/hook")).unwrap();
        assert_eq!(body["recipientKey"], "15551234567@c.us");
        assert!(body.get("verifiedAt").is_some());
        assert!(body.get("notifyTarget").is_none());
    }

    #[tokio::test]
    async fn test_invalid_target_is_an_error() {
        let notifier = HttpCallbackNotifier::new(Duration::from_secs(1)).unwrap();
        let result = notifier.notify_verified(&notice("not a url")).await;
        assert!(result.is_err());
    }
}
