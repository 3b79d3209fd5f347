//! Verification notifier module
//!
//! Tells a third party that a recipient verified:
//!
//! - **Log**: records the notice only (development)
//! - **HTTP**: posts the notice to the challenge's callback URL once

use std::sync::Arc;

use otp_core::services::verification::VerificationNotifier;
use otp_shared::config::NotifyConfig;

pub mod http_callback;
pub mod log_notifier;

pub use http_callback::HttpCallbackNotifier;
pub use log_notifier::LogNotifier;

use crate::InfrastructureError;

/// Create a notifier based on configuration
pub fn create_notifier(
    config: &NotifyConfig,
) -> Result<Arc<dyn VerificationNotifier>, InfrastructureError> {
    match config.provider.as_str() {
        "log" => Ok(Arc::new(LogNotifier)),
        "http" => Ok(Arc::new(HttpCallbackNotifier::new(config.timeout())?)),
        other => {
            tracing::warn!(
                "Unknown notify provider '{}', using log implementation",
                other
            );
            Ok(Arc::new(LogNotifier))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_notifier_variants() {
        let log = NotifyConfig::default();
        assert!(create_notifier(&log).is_ok());

        let http = NotifyConfig {
            provider: "http".to_string(),
            ..Default::default()
        };
        assert!(create_notifier(&http).is_ok());
    }
}
