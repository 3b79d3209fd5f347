//! End-to-end OTP flows through the public core API with a scripted transport

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use otp_core::services::transport::mock::{ScriptedTransport, SendOutcome};
use otp_core::{
    event_channel, ChallengeStore, DeliveryOrchestrator, RetryPolicy, SessionConfig,
    SessionManager, SessionPhase, SystemClock, VerificationConfig, VerificationEngine,
    VerificationNotice, VerificationNotifier, VerifyError,
};
use otp_shared::config::OtpConfig;

const TTL: Duration = Duration::from_secs(300);

#[derive(Default)]
struct CollectingNotifier {
    notices: Mutex<Vec<VerificationNotice>>,
}

#[async_trait]
impl VerificationNotifier for CollectingNotifier {
    async fn notify_verified(&self, notice: &VerificationNotice) -> Result<(), String> {
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

struct Service {
    transport: Arc<ScriptedTransport>,
    session: Arc<SessionManager>,
    store: Arc<ChallengeStore>,
    delivery: DeliveryOrchestrator,
    engine: Arc<VerificationEngine>,
    notifier: Arc<CollectingNotifier>,
}

fn service() -> Service {
    let otp = OtpConfig::default();
    let (sink, stream) = event_channel();
    let transport = Arc::new(ScriptedTransport::new(sink));
    let session = SessionManager::new(transport.clone(), SessionConfig::default());

    let clock = Arc::new(SystemClock);
    let store = Arc::new(ChallengeStore::new(clock.clone()));
    let notifier = Arc::new(CollectingNotifier::default());
    let engine = Arc::new(VerificationEngine::new(
        store.clone(),
        session.clone(),
        notifier.clone(),
        clock,
        VerificationConfig::from(&otp),
    ));
    session.spawn_event_loop(stream, engine.clone());
    session.start();

    let delivery = DeliveryOrchestrator::new(store.clone(), session.clone(), otp, RetryPolicy::default());

    Service {
        transport,
        session,
        store,
        delivery,
        engine,
        notifier,
    }
}

#[tokio::test(start_paused = true)]
async fn test_issue_then_verify_explicit_once() {
    let svc = service();
    let recipient = "15551234567@x";

    let challenge = svc.delivery.issue_and_send(recipient, None, TTL).await.unwrap();
    assert_eq!(challenge.secret.len(), 6);
    assert!(challenge.secret.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(challenge.expires_at - challenge.created_at, chrono::Duration::minutes(5));

    assert_eq!(svc.engine.verify_explicit(recipient, &challenge.secret).await, Ok(()));
    assert_eq!(
        svc.engine.verify_explicit(recipient, &challenge.secret).await,
        Err(VerifyError::InvalidOrExpired)
    );
}

#[tokio::test(start_paused = true)]
async fn test_recovers_from_session_loss_on_first_send() {
    let svc = service();
    svc.transport.push_outcomes([SendOutcome::SessionLost]);

    let challenge = svc
        .delivery
        .issue_and_send("15551234567@c.us", None, TTL)
        .await
        .unwrap();

    let sent = svc.transport.sent_messages();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains(&challenge.secret));
    assert_eq!(svc.session.phase(), SessionPhase::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_inbound_reply_verifies_and_notifies() {
    let svc = service();
    let recipient = "15551234567@c.us";
    let challenge = svc
        .delivery
        .issue_and_send(recipient, Some("https://example.test/verified".to_string()), TTL)
        .await
        .unwrap();

    svc.transport.events().inbound(recipient, challenge.secret.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(
        svc.transport.last_text_to(recipient).as_deref(),
        Some(OtpConfig::default().ack_message.as_str())
    );
    let notices = svc.notifier.notices.lock().unwrap().clone();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].notify_target, "https://example.test/verified");
    assert_eq!(
        svc.engine.verify_explicit(recipient, &challenge.secret).await,
        Err(VerifyError::InvalidOrExpired)
    );
}

#[tokio::test(start_paused = true)]
async fn test_code_is_not_honoured_after_ttl() {
    let svc = service();
    let recipient = "15551234567@c.us";
    let challenge = svc.delivery.issue_and_send(recipient, None, TTL).await.unwrap();

    tokio::time::sleep(TTL + Duration::from_secs(1)).await;

    assert!(svc.store.get(recipient).await.is_none());
    assert_eq!(
        svc.engine.verify_explicit(recipient, &challenge.secret).await,
        Err(VerifyError::InvalidOrExpired)
    );
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_after_traffic_tears_down_once() {
    let svc = service();
    svc.delivery
        .issue_and_send("15551234567@c.us", None, TTL)
        .await
        .unwrap();

    svc.session.shutdown().await;
    svc.session.shutdown().await;

    assert_eq!(svc.transport.destroy_count(), 1);
    assert!(!svc.session.is_ready());
}
