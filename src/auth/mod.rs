// Authentication module
// Argon2 credential hashing, stateless JWT sessions, and role policies

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, register_handler};
pub use middleware::CurrentUser;
pub use models::{LoginRequest, RegisterRequest, Role, TokenResponse, User, UserResponse};
pub use repository::UserRepository;
pub use service::AuthService;
pub use token::TokenService;
