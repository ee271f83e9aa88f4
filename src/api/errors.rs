//! # API Errors
//!
//! The single error-kind type every handler returns, and the one place
//! where kinds become status codes and JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthError;
use crate::store::{IdError, ObjectId, StoreError};
use crate::validation::{ValidationFailure, Violation};

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable kind, e.g. `VALIDATION_ERROR`
    pub code: String,

    pub message: String,

    /// Broken rules, only for validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Violation>>,
}

/// Request-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Payload broke one or more field rules
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// Body or query string could not be decoded
    #[error("Malformed request: {0}")]
    MalformedBody(String),

    /// External identifier is not 24 hex characters
    #[error("{0}")]
    InvalidIdentifier(#[from] IdError),

    /// No record matched
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Unique key already taken
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials, or a missing, invalid or expired token
    #[error("{0}")]
    Authentication(AuthError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Hashing, signing or store failure; message is logged, never returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::MalformedBody(_) => (StatusCode::BAD_REQUEST, "MALFORMED_REQUEST"),
            ApiError::InvalidIdentifier(_) => (StatusCode::BAD_REQUEST, "INVALID_IDENTIFIER"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Authentication(_) => (StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_client_error() {
            ApiError::Authentication(err)
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { .. } => ApiError::Conflict("Record already exists".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Map a store failure to an API error, logging it with the operation and
/// entity id that were in flight.
pub fn store_failure(
    operation: &'static str,
    id: Option<ObjectId>,
) -> impl FnOnce(StoreError) -> ApiError {
    move |err| {
        if err.is_duplicate_key() {
            tracing::warn!(operation, id = ?id, error = %err, "unique key rejected write");
        } else {
            tracing::error!(operation, id = ?id, error = %err, "store operation failed");
        }
        ApiError::from(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            ApiError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        let details = match &self {
            ApiError::Validation(failure) => Some(failure.violations().to_vec()),
            _ => None,
        };

        match &self {
            ApiError::Internal(_) => tracing::error!(error = %self, "internal server error"),
            ApiError::Authentication(_) => tracing::warn!(error = %self, "authentication failed"),
            _ => tracing::debug!(error = %self, "request rejected"),
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
