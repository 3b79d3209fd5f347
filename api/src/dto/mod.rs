//! Request and response bodies

pub mod error;
pub mod otp;

pub use error::ErrorResponse;
pub use otp::{
    HealthResponse, SendOtpRequest, SendOtpResponse, StatusResponse, VerifyOtpRequest,
    VerifyOtpResponse,
};
