// Request guard: bearer-token authentication and role policies

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::debug;

use crate::auth::{error::AuthError, models::{Role, User}, service::AuthService};

/// The authenticated identity for a request
///
/// Extracting this runs the full authentication chain: bearer token →
/// signature/expiry check → re-resolution of the subject from storage.
/// Authorization is then a separate, per-operation decision made through
/// the policy methods below.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

impl CurrentUser {
    /// Admin-only policy
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.user.role == Role::Admin {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions {
                required: Role::Admin,
                actual: self.user.role,
            })
        }
    }

    /// Self-or-admin policy: admins may target anyone, others only themselves
    pub fn require_self_or_admin(&self, target_id: i32) -> Result<(), AuthError> {
        if self.user.role == Role::Admin || self.user.id == target_id {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions {
                required: Role::Admin,
                actual: self.user.role,
            })
        }
    }
}

/// Pull the raw token out of a standard `Authorization: Bearer <token>` header
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<AuthService>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_string();

        let service = Arc::<AuthService>::from_ref(state);
        let user = service.authenticate(&token).await?;

        debug!("Authenticated user id={} role={}", user.id, user.role);
        Ok(CurrentUser { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Utc;

    fn parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();

        let (parts, _) = req.into_parts();
        parts
    }

    fn parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    fn user_with(id: i32, role: Role) -> CurrentUser {
        CurrentUser {
            user: User {
                id,
                name: "Test User".to_string(),
                email: format!("user{}@example.com", id),
                password_hash: "$argon2id$unused".to_string(),
                role,
                phone: "1234567".to_string(),
                city: "C".to_string(),
                country: "X".to_string(),
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        let parts = parts_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_is_missing_token() {
        let parts = parts_without_auth();
        assert!(matches!(bearer_token(&parts), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_non_bearer_schemes_are_rejected() {
        for bad in ["Basic dXNlcjpwYXNz", "token_without_scheme", "bearer lowercase"] {
            let parts = parts_with_auth(bad);
            assert!(matches!(bearer_token(&parts), Err(AuthError::InvalidToken)));
        }
    }

    #[test]
    fn test_admin_policy() {
        assert!(user_with(1, Role::Admin).require_admin().is_ok());

        let err = user_with(1, Role::Staff).require_admin().unwrap_err();
        match err {
            AuthError::InsufficientPermissions { required, actual } => {
                assert_eq!(required, Role::Admin);
                assert_eq!(actual, Role::Staff);
            }
            other => panic!("expected InsufficientPermissions, got {:?}", other),
        }
    }

    #[test]
    fn test_self_or_admin_policy() {
        // Staff may target themselves, nobody else
        assert!(user_with(7, Role::Staff).require_self_or_admin(7).is_ok());
        assert!(user_with(7, Role::Staff).require_self_or_admin(8).is_err());

        // Admins may target anyone
        assert!(user_with(1, Role::Admin).require_self_or_admin(1).is_ok());
        assert!(user_with(1, Role::Admin).require_self_or_admin(999).is_ok());
    }
}
