// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};
use crate::auth::models::Role;

/// Authentication and authorization error types
#[derive(Debug)]
pub enum AuthError {
    // Authentication errors
    ValidationError(String),
    InvalidCredentials,
    InvalidToken,
    ExpiredToken,
    MissingToken,
    /// Token was valid but its subject no longer exists in storage
    UserNoLongerExists,
    EmailAlreadyExists,
    DatabaseError(String),
    PasswordHashError,
    TokenGenerationError(String),

    // Authorization errors
    /// User lacks the required role for the operation
    InsufficientPermissions {
        required: Role,
        actual: Role,
    },
    /// Role value outside the accepted set
    InvalidRole(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::ExpiredToken => write!(f, "Token has expired"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::UserNoLongerExists => write!(f, "Could not validate credentials"),
            AuthError::EmailAlreadyExists => write!(f, "Email already registered"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AuthError::PasswordHashError => write!(f, "Password hashing error"),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
            AuthError::InsufficientPermissions { required, actual } => {
                write!(f, "Insufficient permissions: required role '{}', but user has role '{}'", required, actual)
            }
            AuthError::InvalidRole(msg) => write!(f, "Invalid role: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::UserNoLongerExists => {
                warn!("Token presented for a user that no longer exists")
            }
            AuthError::InsufficientPermissions { required, actual } => {
                warn!("Authorization failed: required role '{}', user has role '{}'", required, actual)
            }
            AuthError::DatabaseError(msg) => error!("Database error in auth: {}", msg),
            AuthError::PasswordHashError => error!("Password hashing error"),
            AuthError::TokenGenerationError(msg) => error!("Token generation error: {}", msg),
            _ => {}
        }

        let body = Json(json!({
            "error": self.error_message(),
        }));

        (self.status_code(), body).into_response()
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::UserNoLongerExists => StatusCode::UNAUTHORIZED,
            AuthError::EmailAlreadyExists => StatusCode::BAD_REQUEST,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHashError => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::InvalidRole(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get a descriptive error message for this error
    /// This message is safe to send to clients (no sensitive data)
    pub fn error_message(&self) -> String {
        match self {
            AuthError::ValidationError(msg) => msg.clone(),
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::InvalidToken => "Invalid token".to_string(),
            AuthError::ExpiredToken => "Token has expired".to_string(),
            AuthError::MissingToken => "Missing authentication token".to_string(),
            AuthError::UserNoLongerExists => "Could not validate credentials".to_string(),
            AuthError::EmailAlreadyExists => "Email already registered".to_string(),
            AuthError::DatabaseError(_) => "Internal server error".to_string(),
            AuthError::PasswordHashError => "Internal server error".to_string(),
            AuthError::TokenGenerationError(_) => "Internal server error".to_string(),
            AuthError::InsufficientPermissions { required, .. } => {
                format!("Insufficient permissions: required role '{}'", required)
            }
            AuthError::InvalidRole(msg) => format!("Invalid role: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_share_one_message() {
        // Unknown email and wrong password must be indistinguishable to clients
        let err = AuthError::InvalidCredentials;
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_message(), "Invalid email or password");
    }

    #[test]
    fn test_token_failures_map_to_unauthorized() {
        for err in [
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
            AuthError::MissingToken,
            AuthError::UserNoLongerExists,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_permission_failure_maps_to_forbidden() {
        let err = AuthError::InsufficientPermissions {
            required: Role::Admin,
            actual: Role::Staff,
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        // The message names only the required role, never the caller's
        assert!(err.error_message().contains("Admin"));
        assert!(!err.error_message().contains("Staff"));
    }

    #[test]
    fn test_internal_failures_do_not_leak_detail() {
        let err = AuthError::DatabaseError("connection refused to 10.0.0.5".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_message(), "Internal server error");
    }
}
