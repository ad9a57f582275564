//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use nicelab_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// HTTP-facing wrapper so handlers can return `AppError` through `?`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status and stable machine code for an error kind.
    pub fn status_and_code(kind: ErrorKind) -> (StatusCode, &'static str) {
        match kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            ErrorKind::Authorization => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::DispatchFailed => (StatusCode::INTERNAL_SERVER_ERROR, "DISPATCH_FAILED"),
            ErrorKind::TimedOut => (StatusCode::INTERNAL_SERVER_ERROR, "PROVISION_TIMEOUT"),
            ErrorKind::ProvisioningFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PROVISION_FAILED")
            }
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::ExternalService => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, code) = Self::status_and_code(err.kind);

        // Server-side detail stays in the logs.
        let message = if err.is_server_error() {
            tracing::error!(kind = %err.kind, error = ?err, "Request failed");
            generic_message(err.kind).to_string()
        } else {
            err.message
        };

        (
            status,
            Json(ApiErrorResponse {
                error: code.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

fn generic_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::DispatchFailed => "The lab machine could not be reached",
        ErrorKind::TimedOut => "The lab machine did not finish provisioning in time",
        ErrorKind::ProvisioningFailed => "The lab machine rejected the provisioning script",
        _ => "An internal error occurred",
    }
}
