//! Business services containing the OTP orchestration logic.

pub mod challenge;
pub mod delivery;
pub mod session;
pub mod transport;
pub mod verification;

// Re-export commonly used types
pub use challenge::{ChallengeStore, ConsumeResult};
pub use delivery::{DeliveryOrchestrator, RetryPolicy};
pub use session::{SessionConfig, SessionManager};
pub use transport::{event_channel, EventSink, EventStream, InboundHandler, Transport, TransportEvent};
pub use verification::{
    InboundOutcome, VerificationConfig, VerificationEngine, VerificationNotice,
    VerificationNotifier,
};
