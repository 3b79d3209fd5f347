//! Utility functions shared across crates

pub mod recipient;

pub use recipient::{canonical_recipient, mask_recipient, RecipientError};
