//! Service wiring
//!
//! Builds the transport, session manager, challenge store, verification
//! engine and delivery orchestrator from configuration, and starts the
//! transport event loop.

use std::sync::Arc;

use tokio::task::JoinHandle;

use otp_core::domain::clock::{Clock, SystemClock};
use otp_core::services::transport::{event_channel, InboundHandler};
use otp_core::{
    ChallengeStore, DeliveryOrchestrator, RetryPolicy, SessionConfig, SessionManager,
    VerificationConfig, VerificationEngine,
};
use otp_infra::transport::GATEWAY_PROVIDER;
use otp_infra::{create_notifier, create_transport};
use otp_shared::AppConfig;

use crate::state::AppState;

/// Everything `main` needs to serve requests and shut down in order
pub struct Runtime {
    pub state: AppState,
    pub session: Arc<SessionManager>,
    /// Drains transport events; ends only if every sink is dropped
    pub event_loop: JoinHandle<()>,
}

/// Build the service graph; must be called inside a Tokio runtime
pub fn build_runtime(config: &AppConfig) -> anyhow::Result<Runtime> {
    let (sink, stream) = event_channel();

    let transport = create_transport(&config.transport, sink.clone())?;
    let session = SessionManager::new(transport, SessionConfig::from(&config.transport));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(ChallengeStore::new(Arc::clone(&clock)));

    let notifier = create_notifier(&config.notify)?;
    let verification = Arc::new(VerificationEngine::new(
        Arc::clone(&store),
        Arc::clone(&session),
        notifier,
        clock,
        VerificationConfig::from(&config.otp),
    ));
    let delivery = Arc::new(DeliveryOrchestrator::new(
        store,
        Arc::clone(&session),
        config.otp.clone(),
        RetryPolicy::from(&config.delivery),
    ));

    let inbound: Arc<dyn InboundHandler> = verification.clone();
    let event_loop = session.spawn_event_loop(stream, inbound);

    tracing::info!(
        transport = session.transport_name(),
        notifier = %config.notify.provider,
        max_attempts = config.delivery.max_attempts,
        "Services initialised"
    );

    let state = AppState {
        delivery,
        verification,
        session: Arc::clone(&session),
        events: sink,
        recipient_suffix: config.otp.recipient_suffix.clone(),
        otp_ttl: config.otp.ttl(),
        gateway_token: webhook_token(config),
    };

    Ok(Runtime {
        state,
        session,
        event_loop,
    })
}

/// Only gateway transports push events over HTTP
fn webhook_token(config: &AppConfig) -> Option<String> {
    if config.transport.provider == GATEWAY_PROVIDER {
        config.transport.gateway_token.clone()
    } else {
        None
    }
}
