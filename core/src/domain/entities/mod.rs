//! Domain entities representing core objects.

pub mod challenge;
pub mod session;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use challenge::{Challenge, CODE_LENGTH};
pub use session::{SessionPhase, SessionState};
