//! Session manager implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use chrono::Utc;
use otp_shared::recipient::mask_recipient;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::entities::session::{SessionPhase, SessionState};
use crate::errors::TransportError;
use crate::services::transport::{EventStream, InboundHandler, Transport, TransportEvent};

use super::config::SessionConfig;

/// Manages the one live transport session.
///
/// Phase changes go through `transition`, which checks and updates the phase
/// atomically under the watch channel's lock. A connect or restart sequence
/// is only started by the caller that moved the phase into `Authenticating`
/// or `Restarting`, and any request arriving while one of those phases is
/// active is a no-op. `connect_lock` additionally keeps transport calls from
/// overlapping.
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    config: SessionConfig,
    state: watch::Sender<SessionState>,
    connect_lock: tokio::sync::Mutex<()>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    closed: AtomicBool,
    this: Weak<SessionManager>,
}

impl SessionManager {
    /// Create a manager in `Uninitialized`; call `start` to connect
    pub fn new(transport: Arc<dyn Transport>, config: SessionConfig) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::new(Utc::now()));
        Arc::new_cyclic(|this| Self {
            transport,
            config,
            state,
            connect_lock: tokio::sync::Mutex::new(()),
            tasks: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
            this: this.clone(),
        })
    }

    /// Non-blocking readiness snapshot
    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase
    }

    /// Copy of the full session state
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch phase changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// `Uninitialized` → `Authenticating`; ignored in any other phase
    pub fn start(&self) -> bool {
        match self.transition(|s| s.phase == SessionPhase::Uninitialized, SessionPhase::Authenticating) {
            Some(epoch) => {
                self.spawn_connect(epoch, false);
                true
            }
            None => false,
        }
    }

    /// Consume transport events until the stream closes.
    ///
    /// Inbound messages are handed to `inbound` on their own task so a slow
    /// reply never holds up session events.
    pub fn spawn_event_loop(
        self: &Arc<Self>,
        mut events: EventStream,
        inbound: Arc<dyn InboundHandler>,
    ) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                this.handle_event(event, &inbound);
            }
            info!("Transport event stream closed");
        })
    }

    /// Apply one transport event
    pub fn handle_event(&self, event: TransportEvent, inbound: &Arc<dyn InboundHandler>) {
        match event {
            TransportEvent::Ready => self.on_ready(),
            TransportEvent::SessionLost { reason } => self.on_session_lost(&reason),
            TransportEvent::InboundMessage { recipient_key, text } => {
                debug!(
                    recipient = %mask_recipient(&recipient_key),
                    "Inbound message received"
                );
                let inbound = Arc::clone(inbound);
                tokio::spawn(async move {
                    inbound.handle_inbound(&recipient_key, &text).await;
                });
            }
        }
    }

    /// Send through the transport without retrying.
    ///
    /// A `SessionLost` failure moves the session to `Disconnected` and
    /// schedules a reconnect before the error is returned.
    pub async fn send(&self, recipient_key: &str, text: &str) -> Result<(), TransportError> {
        match self.transport.send_message(recipient_key, text).await {
            Ok(()) => Ok(()),
            Err(err) => {
                if let TransportError::SessionLost { reason } = &err {
                    self.on_session_lost(reason);
                } else {
                    warn!(
                        recipient = %mask_recipient(recipient_key),
                        error = %err,
                        "Transient transport send failure"
                    );
                }
                Err(err)
            }
        }
    }

    /// Kick off a reconnect if none is running, then wait up to `wait` for `Ready`
    pub async fn reconnect_and_wait(&self, wait: Duration) -> bool {
        if self.is_ready() {
            return true;
        }
        if self.closed.load(Ordering::SeqCst) {
            return false;
        }

        let mut rx = self.state.subscribe();
        match self.phase() {
            SessionPhase::Uninitialized => {
                self.start();
            }
            SessionPhase::Disconnected => {
                self.reconnect_now();
            }
            _ => {}
        }

        let ready = matches!(
            tokio::time::timeout(wait, rx.wait_for(|s| s.is_ready())).await,
            Ok(Ok(_))
        );
        if !ready {
            debug!(phase = %self.phase(), "Transport not ready within wait");
        }
        ready
    }

    /// `Disconnected` → `Authenticating` immediately, skipping the reconnect delay
    pub fn reconnect_now(&self) -> bool {
        match self.transition(|s| s.phase == SessionPhase::Disconnected, SessionPhase::Authenticating) {
            Some(epoch) => {
                self.spawn_connect(epoch, true);
                true
            }
            None => false,
        }
    }

    /// Ordered teardown: stop timers, destroy the transport, refuse further transitions.
    ///
    /// Teardown failure or timeout is logged and ignored.
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(transport = self.transport.name(), "Shutting down transport session");

        let tasks: Vec<JoinHandle<()>> = self.lock_tasks().drain(..).collect();
        for task in tasks {
            task.abort();
        }

        self.state.send_modify(|s| {
            s.phase = SessionPhase::Disconnected;
            s.last_transition_at = Utc::now();
        });
        self.teardown().await;
    }

    fn on_ready(&self) {
        let Some(epoch) =
            self.transition(|s| s.phase == SessionPhase::Authenticating, SessionPhase::Ready)
        else {
            debug!(phase = %self.phase(), "Ignoring ready signal");
            return;
        };

        info!(
            transport = self.transport.name(),
            epoch,
            event = "transport_ready",
            "Transport session ready"
        );
        self.schedule_restart(epoch);
    }

    fn on_session_lost(&self, reason: &str) {
        let lost = self.transition(
            |s| matches!(s.phase, SessionPhase::Ready | SessionPhase::Authenticating),
            SessionPhase::Disconnected,
        );
        if lost.is_none() {
            debug!(reason, phase = %self.phase(), "Ignoring session loss");
            return;
        }

        warn!(
            transport = self.transport.name(),
            reason,
            retry_in = ?self.config.reconnect_delay,
            event = "transport_session_lost",
            "Transport session lost"
        );
        self.schedule_reconnect();
    }

    fn schedule_reconnect(&self) {
        let Some(this) = self.this.upgrade() else { return };
        let delay = self.config.reconnect_delay;
        self.track(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.reconnect_now();
        }));
    }

    fn schedule_restart(&self, epoch: u64) {
        let Some(this) = self.this.upgrade() else { return };
        let interval = self.config.restart_interval;
        self.track(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            this.restart(epoch).await;
        }));
    }

    fn arm_auth_timeout(&self, epoch: u64) {
        let Some(this) = self.this.upgrade() else { return };
        let timeout = self.config.auth_timeout;
        self.track(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if this.is_current(epoch, SessionPhase::Authenticating) {
                this.on_session_lost("authentication timed out");
            }
        }));
    }

    fn spawn_connect(&self, epoch: u64, teardown_first: bool) {
        let Some(this) = self.this.upgrade() else { return };
        self.track(tokio::spawn(async move {
            this.connect(epoch, teardown_first).await;
        }));
    }

    async fn connect(&self, epoch: u64, teardown_first: bool) {
        let _guard = self.connect_lock.lock().await;
        if !self.is_current(epoch, SessionPhase::Authenticating) {
            debug!(epoch, "Skipping stale connect attempt");
            return;
        }

        if teardown_first {
            self.teardown().await;
        }

        self.arm_auth_timeout(epoch);
        info!(transport = self.transport.name(), epoch, "Initialising transport");
        if let Err(err) = self.transport.initialize().await {
            error!(
                transport = self.transport.name(),
                error = %err,
                event = "transport_init_failed",
                "Transport initialisation failed"
            );
            if self.is_current(epoch, SessionPhase::Authenticating) {
                self.on_session_lost(&format!("initialisation failed: {}", err));
            }
        }
    }

    async fn restart(&self, ready_epoch: u64) {
        let restarting = self.transition(
            |s| s.phase == SessionPhase::Ready && s.epoch == ready_epoch,
            SessionPhase::Restarting,
        );
        if restarting.is_none() {
            return;
        }
        info!(
            transport = self.transport.name(),
            interval = ?self.config.restart_interval,
            event = "transport_proactive_restart",
            "Proactively restarting transport session"
        );

        let epoch = {
            let _guard = self.connect_lock.lock().await;
            self.teardown().await;
            self.transition(|s| s.phase == SessionPhase::Restarting, SessionPhase::Authenticating)
        };
        if let Some(epoch) = epoch {
            self.spawn_connect(epoch, false);
        }
    }

    async fn teardown(&self) {
        match tokio::time::timeout(self.config.teardown_timeout, self.transport.destroy()).await {
            Ok(Ok(())) => debug!(transport = self.transport.name(), "Transport torn down"),
            Ok(Err(err)) => warn!(
                transport = self.transport.name(),
                error = %err,
                "Transport teardown failed, continuing"
            ),
            Err(_) => warn!(
                transport = self.transport.name(),
                timeout = ?self.config.teardown_timeout,
                "Transport teardown timed out, continuing"
            ),
        }
    }

    /// Move to `to` if `allowed` holds for the current state.
    ///
    /// Returns the epoch after the transition, or `None` if nothing changed.
    fn transition(
        &self,
        allowed: impl FnOnce(&SessionState) -> bool,
        to: SessionPhase,
    ) -> Option<u64> {
        let mut result = None;
        let closed = &self.closed;
        self.state.send_if_modified(|state| {
            if closed.load(Ordering::SeqCst) || !allowed(state) {
                return false;
            }
            let from = state.phase;
            state.phase = to;
            state.last_transition_at = Utc::now();
            if to == SessionPhase::Authenticating {
                state.epoch += 1;
            }
            result = Some(state.epoch);
            debug!(%from, %to, epoch = state.epoch, "Session phase transition");
            true
        });
        result
    }

    fn is_current(&self, epoch: u64, phase: SessionPhase) -> bool {
        let state = self.state.borrow();
        state.epoch == epoch && state.phase == phase
    }

    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self.lock_tasks();
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
