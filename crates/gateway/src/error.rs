//! Error types for the gateway layer

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use youmeet_bookings::BookingError;
use youmeet_users::AuthError;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    AuthenticationFailed(String),

    #[error("{0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Backend details stay in the logs.
            GatewayError::InternalError(detail) => {
                error!(%detail, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<AuthError> for GatewayError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                GatewayError::AuthenticationFailed(err.to_string())
            }
            AuthError::Persistence(_) => GatewayError::InternalError(err.to_string()),
            AuthError::Validation(_)
            | AuthError::DuplicateEmail
            | AuthError::InvalidRole(_)
            | AuthError::NotFound(_) => GatewayError::InvalidRequest(err.to_string()),
        }
    }
}

impl From<BookingError> for GatewayError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Persistence(_) => GatewayError::InternalError(err.to_string()),
            BookingError::Validation(_)
            | BookingError::InvalidTimeFormat(_)
            | BookingError::NotFound(_)
            | BookingError::InvalidClient => GatewayError::InvalidRequest(err.to_string()),
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}
