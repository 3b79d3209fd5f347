//! Transport session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connectivity phase of the transport session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Authenticating,
    Ready,
    Disconnected,
    Restarting,
}

impl SessionPhase {
    /// A connect or restart sequence is already running
    pub fn is_transitioning(&self) -> bool {
        matches!(self, SessionPhase::Authenticating | SessionPhase::Restarting)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionPhase::Uninitialized => "uninitialized",
            SessionPhase::Authenticating => "authenticating",
            SessionPhase::Ready => "ready",
            SessionPhase::Disconnected => "disconnected",
            SessionPhase::Restarting => "restarting",
        };
        f.write_str(name)
    }
}

/// Process-wide session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current phase; exactly one at a time
    pub phase: SessionPhase,

    /// When `phase` last changed
    pub last_transition_at: DateTime<Utc>,

    /// Incremented on every entry into `Authenticating`; timers armed for an
    /// older epoch are ignored
    pub epoch: u64,
}

impl SessionState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            last_transition_at: now,
            epoch: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == SessionPhase::Ready
    }
}
