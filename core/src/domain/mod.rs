//! Domain layer containing entities and the clock seam.

pub mod clock;
pub mod entities;

// Re-export commonly used domain types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entities::{Challenge, SessionPhase, SessionState, CODE_LENGTH};
