//! # OtpRelay Core
//!
//! Core logic for delivering one-time passcodes over a messaging transport
//! and verifying them. This crate contains the domain entities, the error
//! taxonomy, and the services that keep the transport session alive and
//! the challenge table consistent.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
