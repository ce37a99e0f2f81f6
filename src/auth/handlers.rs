// HTTP handlers for registration and login

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
    service::AuthService,
};

/// Register a new user
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input or email already registered", body = String, example = json!({"error": "Email already registered"}))
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(service): State<Arc<AuthService>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    tracing::debug!("Registration request received");

    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let user = service.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticate and receive a bearer token
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = TokenResponse),
        (status = 400, description = "Malformed request", body = String),
        (status = 401, description = "Invalid credentials", body = String, example = json!({"error": "Invalid email or password"}))
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(service): State<Arc<AuthService>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    tracing::debug!("Login request received");

    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let tokens = service.login(&request.email, &request.password).await?;
    Ok(Json(tokens))
}
