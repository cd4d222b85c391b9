//! Caller-visible error taxonomy.
//!
//! Every failure that crosses the HTTP boundary is one of four kinds. Each kind
//! maps to a fixed status code, a machine-readable `code` tag and a fixed
//! message prefix, so gateways and clients can route on either without parsing
//! free-form text:
//!
//! | Variant                          | Status | Prefix                  |
//! |----------------------------------|--------|-------------------------|
//! | [`AppError::InvalidInput`]       | 400    | `Bad Request: `         |
//! | [`AppError::NotFound`]           | 404    | `Not Found: `           |
//! | [`AppError::ServiceUnavailable`] | 503    | `Service Unavailable: ` |
//! | [`AppError::Internal`]           | 500    | `Internal Error: `      |
//!
//! Messages carried by [`AppError::Internal`] are fixed summaries chosen at the
//! classification site. Driver output is logged there and never stored here.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON envelope for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorInfo,
}

/// Error details rendered to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// Malformed or conflicting caller-supplied data.
    #[error("Bad Request: {0}")]
    InvalidInput(String),

    /// The resolution target does not exist.
    #[error("Not Found: {0}")]
    NotFound(String),

    /// Transient condition; the caller should retry.
    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),

    /// Unexpected fault inside the service.
    #[error("Internal Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable tag for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "bad_request",
            AppError::NotFound(_) => "not_found",
            AppError::ServiceUnavailable(_) => "service_unavailable",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "invalid value".to_string());
                format!("{field}: {reason}")
            })
            .collect::<Vec<_>>()
            .join(", ");

        AppError::bad_request(format!("Validation error: {fields}"))
    }
}
