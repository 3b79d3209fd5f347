//! Domain-specific error types and error handling.

mod types;

pub use types::{DeliveryError, TransportError, VerifyError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Verify(#[from] VerifyError),
}

pub type DomainResult<T> = Result<T, DomainError>;
