//! Error handling for HTTP handlers

pub mod error;

pub use error::ApiError;
