//! Inbound and explicit verification against a live scripted session

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::clock::SystemClock;
use crate::errors::VerifyError;
use crate::services::challenge::ChallengeStore;
use crate::services::session::{SessionConfig, SessionManager};
use crate::services::transport::mock::{ScriptedTransport, SendOutcome};
use crate::services::transport::{event_channel, InboundHandler};
use crate::services::verification::{
    InboundOutcome, VerificationConfig, VerificationEngine, VerificationNotice,
    VerificationNotifier,
};

const RECIPIENT: &str = "15551234567@c.us";
const TTL: Duration = Duration::from_secs(300);

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<VerificationNotice>>,
    fail: bool,
}

#[async_trait]
impl VerificationNotifier for RecordingNotifier {
    async fn notify_verified(&self, notice: &VerificationNotice) -> Result<(), String> {
        self.notices.lock().unwrap().push(notice.clone());
        if self.fail {
            return Err("callback unreachable".to_string());
        }
        Ok(())
    }
}

struct NoInbound;

#[async_trait]
impl InboundHandler for NoInbound {
    async fn handle_inbound(&self, _recipient_key: &str, _text: &str) {}
}

struct Harness {
    transport: Arc<ScriptedTransport>,
    store: Arc<ChallengeStore>,
    notifier: Arc<RecordingNotifier>,
    engine: VerificationEngine,
}

async fn harness_with(notifier: RecordingNotifier) -> Harness {
    let (sink, stream) = event_channel();
    let transport = Arc::new(ScriptedTransport::new(sink));
    let session = SessionManager::new(transport.clone(), SessionConfig::default());
    session.spawn_event_loop(stream, Arc::new(NoInbound));
    assert!(session.reconnect_and_wait(Duration::from_secs(5)).await);

    let clock = Arc::new(SystemClock);
    let store = Arc::new(ChallengeStore::new(clock.clone()));
    let notifier = Arc::new(notifier);
    let engine = VerificationEngine::new(
        store.clone(),
        session,
        notifier.clone(),
        clock,
        VerificationConfig {
            ack_message: "ok".to_string(),
            nack_message: "nope".to_string(),
        },
    );

    Harness {
        transport,
        store,
        notifier,
        engine,
    }
}

async fn harness() -> Harness {
    harness_with(RecordingNotifier::default()).await
}

fn wrong_code(secret: &str) -> &'static str {
    if secret == "111111" {
        "222222"
    } else {
        "111111"
    }
}

#[tokio::test(start_paused = true)]
async fn test_inbound_match_acks_and_notifies() {
    let h = harness().await;
    let challenge = h
        .store
        .issue(RECIPIENT, Some("https://example.test/hook".to_string()), TTL)
        .await;

    let outcome = h.engine.verify_inbound(RECIPIENT, &challenge.secret).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(outcome, InboundOutcome::Verified);
    assert_eq!(h.transport.last_text_to(RECIPIENT).as_deref(), Some("ok"));
    let notices = h.notifier.notices.lock().unwrap().clone();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].recipient_key, RECIPIENT);
    assert_eq!(notices[0].notify_target, "https://example.test/hook");
    assert!(h.store.get(RECIPIENT).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_inbound_match_tolerates_surrounding_whitespace() {
    let h = harness().await;
    let challenge = h.store.issue(RECIPIENT, None, TTL).await;

    let text = format!("  {}\n", challenge.secret);
    assert_eq!(h.engine.verify_inbound(RECIPIENT, &text).await, InboundOutcome::Verified);
}

#[tokio::test(start_paused = true)]
async fn test_inbound_match_without_target_skips_notification() {
    let h = harness().await;
    let challenge = h.store.issue(RECIPIENT, None, TTL).await;

    h.engine.verify_inbound(RECIPIENT, &challenge.secret).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(h.notifier.notices.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_inbound_mismatch_nacks_and_keeps_challenge() {
    let h = harness().await;
    let challenge = h.store.issue(RECIPIENT, None, TTL).await;

    let outcome = h.engine.verify_inbound(RECIPIENT, wrong_code(&challenge.secret)).await;

    assert_eq!(outcome, InboundOutcome::Rejected);
    assert_eq!(h.transport.last_text_to(RECIPIENT).as_deref(), Some("nope"));
    assert!(h.store.get(RECIPIENT).await.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_inbound_without_challenge_is_silent() {
    let h = harness().await;

    let outcome = h.engine.verify_inbound(RECIPIENT, "hello there").await;

    assert_eq!(outcome, InboundOutcome::Ignored);
    assert!(h.transport.sent_messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_ack_does_not_undo_verification() {
    let h = harness().await;
    let challenge = h.store.issue(RECIPIENT, None, TTL).await;
    h.transport.push_outcomes([SendOutcome::Transient]);

    let outcome = h.engine.verify_inbound(RECIPIENT, &challenge.secret).await;

    assert_eq!(outcome, InboundOutcome::Verified);
    assert!(h.store.get(RECIPIENT).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_failed_notification_is_swallowed() {
    let h = harness_with(RecordingNotifier {
        fail: true,
        ..Default::default()
    })
    .await;
    let challenge = h
        .store
        .issue(RECIPIENT, Some("https://example.test/hook".to_string()), TTL)
        .await;

    let outcome = h.engine.verify_inbound(RECIPIENT, &challenge.secret).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(outcome, InboundOutcome::Verified);
    assert_eq!(h.notifier.notices.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_verification_is_single_use() {
    let h = harness().await;
    let challenge = h
        .store
        .issue(RECIPIENT, Some("https://example.test/hook".to_string()), TTL)
        .await;

    assert_eq!(h.engine.verify_explicit(RECIPIENT, &challenge.secret).await, Ok(()));
    assert_eq!(
        h.engine.verify_explicit(RECIPIENT, &challenge.secret).await,
        Err(VerifyError::InvalidOrExpired)
    );

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(h.transport.sent_messages().is_empty());
    assert!(h.notifier.notices.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_explicit_mismatch_is_invalid_or_expired() {
    let h = harness().await;
    let challenge = h.store.issue(RECIPIENT, None, TTL).await;

    assert_eq!(
        h.engine.verify_explicit(RECIPIENT, wrong_code(&challenge.secret)).await,
        Err(VerifyError::InvalidOrExpired)
    );
    assert_eq!(
        h.engine.verify_explicit("unknown@c.us", "123456").await,
        Err(VerifyError::InvalidOrExpired)
    );
}

#[tokio::test(start_paused = true)]
async fn test_engine_handles_inbound_events() {
    let h = harness().await;
    let challenge = h.store.issue(RECIPIENT, None, TTL).await;

    h.engine.handle_inbound(RECIPIENT, &challenge.secret).await;

    assert_eq!(h.transport.last_text_to(RECIPIENT).as_deref(), Some("ok"));
}
