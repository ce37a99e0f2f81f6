// Error handling for the API boundary
// Maps internal failures to transport statuses and non-leaking responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::AuthError;

/// Boundary error type for the user endpoints
///
/// Auth-core failures pass through unchanged (they carry their own
/// response mapping); everything else is translated here.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Query/request validation failures
    /// Maps to HTTP 400 Bad Request
    #[error("Request validation failed: {0}")]
    ValidationError(String),

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    #[error("{resource} with id {id} not found")]
    NotFound { resource: String, id: String },

    /// Failures raised by the authentication/authorization core
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database operation errors
    /// Maps to HTTP 500; detail is logged, never sent to clients
    #[error("database error")]
    DatabaseError(#[from] sqlx::Error),
}

/// Consistent error response structure
///
/// Machine-readable code plus a human-readable message; details are
/// reserved for field-level validation payloads.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            // The auth core already knows its status codes and safe messages
            ApiError::Auth(err) => return err.into_response(),

            ApiError::ValidationError(msg) => {
                debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            ApiError::NotFound { ref resource, ref id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{} with id {} not found", resource, id),
                )
            }
            ApiError::DatabaseError(ref db_error) => {
                // Full detail stays in the logs
                error!("Database error: {:?}", db_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error_code: error_code.to_string(),
            message,
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Auth(err) => err.status_code(),
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
