//! Mapping from domain failures to HTTP responses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use validator::ValidationErrors;

use otp_core::errors::{DeliveryError, DomainError, TransportError, VerifyError};
use otp_shared::recipient::RecipientError;

use crate::dto::ErrorResponse;

/// Every error an endpoint can return
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("Transport event stream is closed")]
    EventsClosed,

    #[error("Missing or invalid gateway token")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Verify(_) => "invalid_otp",
            ApiError::Delivery(DeliveryError::TransportUnavailable { .. }) => "transport_unavailable",
            ApiError::Delivery(DeliveryError::DeliveryFailed { .. }) => "delivery_failed",
            ApiError::EventsClosed => "service_unavailable",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Verify(_) => StatusCode::BAD_REQUEST,
            ApiError::Delivery(_) | ApiError::EventsClosed => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        HttpResponse::build(status).json(ErrorResponse::new(self.code(), self.to_string()))
    }
}

impl From<RecipientError> for ApiError {
    fn from(err: RecipientError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .next()
            .unwrap_or_else(|| "Invalid request".to_string());
        ApiError::Validation(message)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => ApiError::Validation(message),
            DomainError::Verify(e) => ApiError::Verify(e),
            DomainError::Delivery(e) => ApiError::Delivery(e),
            DomainError::Transport(TransportError::SessionLost { .. }) => {
                ApiError::Delivery(DeliveryError::TransportUnavailable { attempts: 0 })
            }
            DomainError::Transport(e) => ApiError::Internal(e.to_string()),
            DomainError::Internal { message } => ApiError::Internal(message),
        }
    }
}
