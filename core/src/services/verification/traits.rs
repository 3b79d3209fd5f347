//! Traits for post-verification notification

use async_trait::async_trait;

use super::types::VerificationNotice;

/// Tells a third party that a recipient verified.
///
/// Called at most once per verified challenge, never retried.
#[async_trait]
pub trait VerificationNotifier: Send + Sync {
    async fn notify_verified(&self, notice: &VerificationNotice) -> Result<(), String>;
}
