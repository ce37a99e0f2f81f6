// Authentication service - business logic layer

use tracing::{info, warn};

use crate::auth::{
    error::AuthError,
    models::{NewUser, RegisterRequest, Role, TokenResponse, User, UserResponse},
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};

/// Authentication service coordinating registration, login and lookups
pub struct AuthService {
    users: UserRepository,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(users: UserRepository, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Register a new user
    ///
    /// The request is assumed schema-valid at this point; the role string
    /// is converted to the closed enum here so nothing else ever sees the
    /// raw value. Duplicate emails are rejected up front, and the database
    /// unique index catches the concurrent-registration race.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AuthError> {
        let role: Role = request.role.parse()?;

        if self.users.email_exists(&request.email).await? {
            warn!("Registration attempt with existing email");
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = PasswordService::hash_password(&request.password)?;

        let user = self
            .users
            .create(&NewUser {
                name: request.name,
                email: request.email,
                password_hash,
                role,
                phone: request.phone,
                city: request.city,
                country: request.country,
            })
            .await?;

        info!("Registered user id={} role={}", user.id, user.role);
        Ok(UserResponse::from(user))
    }

    /// Authenticate credentials and issue a session token
    ///
    /// An unknown email and a wrong password collapse into the same
    /// `InvalidCredentials` failure so callers cannot probe for accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) if PasswordService::verify_password(password, &user.password_hash) => user,
            _ => {
                warn!("Failed login attempt");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let access_token = self.tokens.issue(&user.email, user.id, user.role)?;
        info!("Issued session token for user id={}", user.id);

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Resolve a bearer token into the current user
    ///
    /// Verifies signature and expiry, then re-resolves the subject against
    /// storage: a token whose user has since disappeared is rejected, and
    /// the stored record (not the embedded claims) is what authorization
    /// decisions run against.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify(token)?;

        self.users
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::UserNoLongerExists)
    }

    /// List users, optionally filtered by name/email substring and country
    pub async fn list_users(
        &self,
        term: Option<&str>,
        country: Option<&str>,
    ) -> Result<Vec<UserResponse>, AuthError> {
        let users = self.users.search(term, country).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Fetch a single user by id
    pub async fn get_user(&self, id: i32) -> Result<Option<UserResponse>, AuthError> {
        Ok(self.users.find_by_id(id).await?.map(UserResponse::from))
    }
}
