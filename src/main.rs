mod auth;
mod db;
mod error;
mod query;
mod validation;

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    AuthService, CurrentUser, LoginRequest, RegisterRequest, Role, TokenResponse, TokenService,
    UserRepository, UserResponse,
};
use error::ApiError;
use query::{QueryParams, QueryValidator};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        list_users,
        get_user_details,
    ),
    components(
        schemas(RegisterRequest, LoginRequest, TokenResponse, UserResponse, Role)
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Role-gated user lookup")
    ),
    info(
        title = "User Management API",
        version = "1.0.0",
        description = "User registration, login and role-gated lookup with JWT sessions",
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    auth: Arc<AuthService>,
}

// Lets handlers and extractors pull the auth service straight out of state
impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Handler for GET /api/users
/// Lists users with optional search and country filter; admin only
#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("q" = Option<String>, Query, description = "Search by name or email substring"),
        ("country" = Option<String>, Query, description = "Filter by country (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 403, description = "Caller is not an admin", body = String)
    ),
    tag = "users"
)]
async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
    current: CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    current.require_admin()?;

    let validated = QueryValidator::validate(params)
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    tracing::debug!(
        "Listing users (q={:?}, country={:?})",
        validated.q,
        validated.country
    );

    let users = state
        .auth
        .list_users(validated.q.as_deref(), validated.country.as_deref())
        .await?;

    tracing::debug!("Query returned {} users", users.len());
    Ok(Json(users))
}

/// Handler for GET /api/users/:id
/// Returns one user's details; admins may see anyone, others only themselves
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = String),
        (status = 403, description = "Caller may not view this user", body = String),
        (status = 404, description = "User not found", body = String)
    ),
    tag = "users"
)]
async fn get_user_details(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    current: CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::debug!("Fetching user with id: {}", id);

    let user = state.auth.get_user(id).await?.ok_or_else(|| {
        tracing::debug!("User with id {} not found", id);
        ApiError::NotFound {
            resource: "User".to_string(),
            id: id.to_string(),
        }
    })?;

    current.require_self_or_admin(id)?;

    Ok(Json(user))
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/users", get(list_users))
        .route("/api/users/:id", get(get_user_details))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("User Management API - Starting...");

    // Get configuration from environment variables
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set in environment");
    let jwt_secret = std::env::var("JWT_SECRET")
        .expect("JWT_SECRET must be set in environment");
    let host = std::env::var("HOST")
        .unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Wire the auth service once; the signing secret lives inside the
    // token service for the rest of the process lifetime
    let auth = Arc::new(AuthService::new(
        UserRepository::new(db_pool),
        TokenService::new(jwt_secret),
    ));

    let app = create_router(AppState { auth });

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("User Management API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
