use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use common::types::Envelope;
use service::auth::errors::AuthError;
use service::complaint::errors::ComplaintError;
use service::errors::StoreError;

/// Request-level error taxonomy. Every variant renders as the uniform
/// `{success, error, details?, message?}` envelope; internal detail is
/// logged, never sent to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<String>),
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            // A single violation reads better as the error itself.
            ApiError::Validation(details) if details.len() == 1 => {
                (StatusCode::BAD_REQUEST, Envelope::<()>::err(details[0].clone()))
            }
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Envelope::<()>::err_with_details("Validation failed", details),
            ),
            ApiError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, Envelope::<()>::err(msg))
            }
            ApiError::Forbidden => {
                (StatusCode::FORBIDDEN, Envelope::<()>::err("Insufficient permissions"))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, Envelope::<()>::err(msg)),
            // Duplicate registration is a 400 on this API, not a 409.
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, Envelope::<()>::err(msg)),
            ApiError::Internal(detail) => {
                error!(error = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::<()>::err("Internal server error"),
                )
            }
        };
        (status, Json(envelope)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ApiError::Validation(vec![msg]),
            AuthError::Conflict => ApiError::Conflict(AuthError::Conflict.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthenticated("Invalid email or password"),
            AuthError::Hash(detail) | AuthError::Token(detail) => ApiError::Internal(detail),
            AuthError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ComplaintError> for ApiError {
    fn from(e: ComplaintError) -> Self {
        match e {
            ComplaintError::Validation(details) => ApiError::Validation(details),
            ComplaintError::NotFound => ApiError::NotFound(ComplaintError::NotFound.to_string()),
            ComplaintError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}
