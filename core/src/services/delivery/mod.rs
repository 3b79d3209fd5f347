//! Delivery orchestrator module
//!
//! Issues a challenge and pushes its code through the transport session,
//! retrying a bounded number of times and forcing a reconnect when the
//! session is not ready.

mod orchestrator;
mod policy;

#[cfg(test)]
mod tests;

pub use orchestrator::DeliveryOrchestrator;
pub use policy::RetryPolicy;
