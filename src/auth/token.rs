// JWT issuance and validation

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::{error::AuthError, models::Role};

/// Session lifetime: one day
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 86_400;

/// Claims embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
}

/// Token service for signing and validating session tokens
///
/// Holds the symmetric signing secret for the process lifetime; it is
/// handed in once at construction and never rotated.
pub struct TokenService {
    secret: String,
    ttl_seconds: i64,
}

impl TokenService {
    /// Create a TokenService issuing tokens with the default 24 hour TTL
    pub fn new(secret: String) -> Self {
        Self::with_ttl(secret, DEFAULT_TOKEN_TTL_SECONDS)
    }

    /// Create a TokenService with an explicit TTL in seconds
    pub fn with_ttl(secret: String, ttl_seconds: i64) -> Self {
        Self { secret, ttl_seconds }
    }

    /// Issue a signed token carrying the user's identity claims
    pub fn issue(&self, email: &str, user_id: i32, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: email.to_string(),
            user_id,
            role,
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate a token's signature and expiry, returning its claims
    ///
    /// Claims are only surfaced after signature validation succeeds; an
    /// unverified payload is never partially trusted.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}
