//! Delivery retry behaviour against a scripted transport

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use otp_shared::config::OtpConfig;

use crate::domain::clock::SystemClock;
use crate::domain::entities::challenge::CODE_LENGTH;
use crate::errors::DeliveryError;
use crate::services::challenge::{ChallengeStore, ConsumeResult};
use crate::services::delivery::{DeliveryOrchestrator, RetryPolicy};
use crate::services::session::{SessionConfig, SessionManager};
use crate::services::transport::mock::{ScriptedTransport, SendOutcome};
use crate::services::transport::{event_channel, InboundHandler};

const RECIPIENT: &str = "15551234567@c.us";
const TTL: Duration = Duration::from_secs(300);

struct IgnoreInbound;

#[async_trait]
impl InboundHandler for IgnoreInbound {
    async fn handle_inbound(&self, _recipient_key: &str, _text: &str) {}
}

struct Harness {
    transport: Arc<ScriptedTransport>,
    session: Arc<SessionManager>,
    store: Arc<ChallengeStore>,
    orchestrator: DeliveryOrchestrator,
}

fn harness() -> Harness {
    let (sink, stream) = event_channel();
    let transport = Arc::new(ScriptedTransport::new(sink));
    let session = SessionManager::new(
        transport.clone(),
        SessionConfig {
            restart_interval: Duration::from_secs(3600),
            reconnect_delay: Duration::from_secs(5),
            auth_timeout: Duration::from_secs(60),
            teardown_timeout: Duration::from_secs(2),
        },
    );
    session.spawn_event_loop(stream, Arc::new(IgnoreInbound));

    let store = Arc::new(ChallengeStore::new(Arc::new(SystemClock)));
    let orchestrator = DeliveryOrchestrator::new(
        store.clone(),
        session.clone(),
        OtpConfig::default(),
        RetryPolicy {
            max_attempts: 3,
            ready_wait: Duration::from_secs(5),
            retry_delay: Duration::from_millis(500),
        },
    );

    Harness {
        transport,
        session,
        store,
        orchestrator,
    }
}

async fn ready_harness() -> Harness {
    let h = harness();
    assert!(h.session.reconnect_and_wait(Duration::from_secs(5)).await);
    h
}

#[tokio::test(start_paused = true)]
async fn test_delivers_code_on_ready_transport() {
    let h = ready_harness().await;

    let challenge = h.orchestrator.issue_and_send(RECIPIENT, None, TTL).await.unwrap();

    assert_eq!(challenge.secret.len(), CODE_LENGTH);
    assert!(challenge.secret.chars().all(|c| c.is_ascii_digit()));
    let text = h.transport.last_text_to(RECIPIENT).unwrap();
    assert!(text.contains(&challenge.secret));
    assert!(text.contains("Valid for 5 minutes"));
    assert_eq!(h.store.get(RECIPIENT).await, Some(challenge));
}

#[tokio::test(start_paused = true)]
async fn test_starts_uninitialised_session_before_sending() {
    let h = harness();

    let result = h.orchestrator.issue_and_send(RECIPIENT, None, TTL).await;

    assert!(result.is_ok());
    assert_eq!(h.transport.init_count(), 1);
    assert_eq!(h.transport.sent_messages().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_session_lost_then_success_sends_once() {
    let h = ready_harness().await;
    h.transport.push_outcomes([SendOutcome::SessionLost]);

    let challenge = h.orchestrator.issue_and_send(RECIPIENT, None, TTL).await.unwrap();

    assert_eq!(h.transport.sent_messages().len(), 1);
    assert_eq!(h.transport.send_attempts(), 2);
    assert_eq!(h.transport.init_count(), 2);
    assert!(h.store.get(RECIPIENT).await.is_some());
    assert!(h.transport.last_text_to(RECIPIENT).unwrap().contains(&challenge.secret));
}

#[tokio::test(start_paused = true)]
async fn test_always_session_lost_fails_and_leaves_no_challenge() {
    let h = ready_harness().await;
    h.transport.set_default_outcome(SendOutcome::SessionLost);

    let err = h.orchestrator.issue_and_send(RECIPIENT, None, TTL).await.unwrap_err();

    assert!(matches!(err, DeliveryError::DeliveryFailed { attempts: 3, .. }));
    assert_eq!(h.transport.send_attempts(), 3);
    assert!(h.transport.sent_messages().is_empty());
    assert!(h.store.get(RECIPIENT).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_never_ready_is_transport_unavailable() {
    let h = harness();
    h.transport.set_ready_on_init(false);

    let err = h.orchestrator.issue_and_send(RECIPIENT, None, TTL).await.unwrap_err();

    assert_eq!(err, DeliveryError::TransportUnavailable { attempts: 3 });
    assert_eq!(h.transport.send_attempts(), 0);
    assert!(h.store.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_retries_without_reconnect() {
    let h = ready_harness().await;
    h.transport.push_outcomes([SendOutcome::Transient]);

    assert!(h.orchestrator.issue_and_send(RECIPIENT, None, TTL).await.is_ok());

    assert_eq!(h.transport.send_attempts(), 2);
    assert_eq!(h.transport.init_count(), 1);
    assert!(h.session.is_ready());
}

#[tokio::test(start_paused = true)]
async fn test_reissue_invalidates_previous_code() {
    let h = ready_harness().await;

    let first = h.orchestrator.issue_and_send(RECIPIENT, None, TTL).await.unwrap();
    let second = h.orchestrator.issue_and_send(RECIPIENT, None, TTL).await.unwrap();

    assert_ne!(first.secret, second.secret);
    assert!(!h.store.try_consume(RECIPIENT, &first.secret).await.is_matched());
    assert_eq!(
        h.store.try_consume(RECIPIENT, &second.secret).await,
        ConsumeResult::Matched(second)
    );
}

#[tokio::test(start_paused = true)]
async fn test_failed_delivery_leaves_other_recipients_alone() {
    let h = ready_harness().await;
    let delivered = h.orchestrator.issue_and_send(RECIPIENT, None, TTL).await.unwrap();

    h.transport.set_default_outcome(SendOutcome::Transient);
    let other = "15550000000@c.us";
    assert!(h.orchestrator.issue_and_send(other, None, TTL).await.is_err());

    assert!(h.store.get(other).await.is_none());
    assert_eq!(h.store.get(RECIPIENT).await, Some(delivered));
}
