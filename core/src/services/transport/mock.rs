//! Scripted transport for tests
//!
//! Lets tests decide how each send attempt ends, whether initialisation
//! reaches `Ready`, and inspect what was actually delivered.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::TransportError;

use super::events::EventSink;
use super::traits::Transport;

/// How a single send attempt ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Deliver,
    SessionLost,
    Transient,
}

/// Transport double driven by a script of send outcomes
pub struct ScriptedTransport {
    events: EventSink,
    script: Mutex<VecDeque<SendOutcome>>,
    default_outcome: Mutex<SendOutcome>,
    sent: Mutex<Vec<(String, String)>>,
    ready_on_init: AtomicBool,
    fail_init: AtomicBool,
    fail_destroy: AtomicBool,
    init_count: AtomicUsize,
    destroy_count: AtomicUsize,
    send_attempts: AtomicUsize,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedTransport {
    /// Transport that becomes ready on every initialisation and delivers everything
    pub fn new(events: EventSink) -> Self {
        Self {
            events,
            script: Mutex::new(VecDeque::new()),
            default_outcome: Mutex::new(SendOutcome::Deliver),
            sent: Mutex::new(Vec::new()),
            ready_on_init: AtomicBool::new(true),
            fail_init: AtomicBool::new(false),
            fail_destroy: AtomicBool::new(false),
            init_count: AtomicUsize::new(0),
            destroy_count: AtomicUsize::new(0),
            send_attempts: AtomicUsize::new(0),
        }
    }

    /// Queue outcomes for the next send attempts, in order
    pub fn push_outcomes(&self, outcomes: impl IntoIterator<Item = SendOutcome>) {
        guard(&self.script).extend(outcomes);
    }

    /// Outcome used once the script is exhausted
    pub fn set_default_outcome(&self, outcome: SendOutcome) {
        *guard(&self.default_outcome) = outcome;
    }

    /// Whether `initialize` emits `Ready`
    pub fn set_ready_on_init(&self, ready: bool) {
        self.ready_on_init.store(ready, Ordering::SeqCst);
    }

    /// Make `initialize` return an error
    pub fn set_fail_init(&self, fail: bool) {
        self.fail_init.store(fail, Ordering::SeqCst);
    }

    /// Make `destroy` return an error
    pub fn set_fail_destroy(&self, fail: bool) {
        self.fail_destroy.store(fail, Ordering::SeqCst);
    }

    /// Handle for emitting events as the transport would
    pub fn events(&self) -> &EventSink {
        &self.events
    }

    /// Messages delivered so far as (recipient, text)
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        guard(&self.sent).clone()
    }

    /// Most recent text delivered to a recipient
    pub fn last_text_to(&self, recipient_key: &str) -> Option<String> {
        guard(&self.sent)
            .iter()
            .rev()
            .find(|(to, _)| to == recipient_key)
            .map(|(_, text)| text.clone())
    }

    pub fn init_count(&self) -> usize {
        self.init_count.load(Ordering::SeqCst)
    }

    pub fn destroy_count(&self) -> usize {
        self.destroy_count.load(Ordering::SeqCst)
    }

    pub fn send_attempts(&self) -> usize {
        self.send_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn initialize(&self) -> Result<(), TransportError> {
        self.init_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(TransportError::transient("scripted initialisation failure"));
        }
        if self.ready_on_init.load(Ordering::SeqCst) {
            self.events.ready();
        }
        Ok(())
    }

    async fn destroy(&self) -> Result<(), TransportError> {
        self.destroy_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(TransportError::transient("scripted teardown failure"));
        }
        Ok(())
    }

    async fn send_message(&self, recipient_key: &str, text: &str) -> Result<(), TransportError> {
        self.send_attempts.fetch_add(1, Ordering::SeqCst);
        let outcome = guard(&self.script)
            .pop_front()
            .unwrap_or_else(|| *guard(&self.default_outcome));

        match outcome {
            SendOutcome::Deliver => {
                guard(&self.sent).push((recipient_key.to_string(), text.to_string()));
                Ok(())
            }
            SendOutcome::SessionLost => Err(TransportError::session_lost("scripted session loss")),
            SendOutcome::Transient => Err(TransportError::transient("scripted transient failure")),
        }
    }
}
