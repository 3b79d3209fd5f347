//! Challenge store module
//!
//! In-memory table of outstanding OTP challenges keyed by recipient, with
//! scheduled expiry and at-most-one-use consumption.

mod store;
mod types;

#[cfg(test)]
mod tests;

pub use store::ChallengeStore;
pub use types::ConsumeResult;
