// User records and authentication DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::error::AuthError;

/// Account role, the sole authorization attribute
///
/// Kept as a closed enum so an out-of-set value can never reach storage;
/// the registration boundary validates the incoming string before
/// converting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    /// Stable string form, matching the values stored in the role column
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Staff => "Staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Staff" => Ok(Role::Staff),
            other => Err(AuthError::InvalidRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = AuthError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub phone: String,
    pub city: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to persist a new user; the password is already hashed
/// by the time this exists
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: String,
    pub city: String,
    pub country: String,
}

/// User response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Amira Benali")]
    pub name: String,
    #[schema(example = "amira@example.com")]
    pub email: String,
    pub role: Role,
    #[schema(example = "0550123456")]
    pub phone: String,
    #[schema(example = "Algiers")]
    pub city: String,
    #[schema(example = "Algeria")]
    pub country: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            city: user.city,
            country: user.country,
            created_at: user.created_at,
        }
    }
}

/// Registration request DTO
///
/// Role arrives as a string and is validated against the accepted set
/// here; conversion to [`Role`] happens in the service layer.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Amira Benali")]
    pub name: String,
    #[validate(email)]
    #[schema(example = "amira@example.com")]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    #[schema(example = "secret1")]
    pub password: String,
    #[validate(custom = "crate::validation::validate_role")]
    #[schema(example = "Staff", pattern = "Admin|Staff")]
    pub role: String,
    #[validate(length(min = 1, max = 20))]
    #[schema(example = "0550123456")]
    pub phone: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Algiers")]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Algeria")]
    pub country: String,
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "amira@example.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
}

/// Login response DTO carrying the bearer token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            name: "Amira Benali".to_string(),
            email: "amira@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            role: Role::Staff,
            phone: "0550123456".to_string(),
            city: "Algiers".to_string(),
            country: "Algeria".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_round_trips_through_strings() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Staff".parse::<Role>().unwrap(), Role::Staff);
        assert_eq!(Role::Admin.as_str(), "Admin");
        assert_eq!(Role::Staff.to_string(), "Staff");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        // Case matters: the accepted set is exactly "Admin" and "Staff"
        for bad in ["admin", "STAFF", "Manager", ""] {
            assert!(matches!(
                bad.parse::<Role>(),
                Err(AuthError::InvalidRole(_))
            ));
        }
    }

    #[test]
    fn test_user_response_excludes_password_hash() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["email"], "amira@example.com");
        assert_eq!(json["role"], "Staff");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            role: "Staff".to_string(),
            phone: "1234567".to_string(),
            city: "C".to_string(),
            country: "X".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid_clone(&valid)
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "12345".to_string(),
            ..valid_clone(&valid)
        };
        assert!(short_password.validate().is_err());

        let bad_role = RegisterRequest {
            role: "Superuser".to_string(),
            ..valid_clone(&valid)
        };
        assert!(bad_role.validate().is_err());

        let empty_phone = RegisterRequest {
            phone: "".to_string(),
            ..valid_clone(&valid)
        };
        assert!(empty_phone.validate().is_err());
    }

    // RegisterRequest does not derive Clone
    fn valid_clone(r: &RegisterRequest) -> RegisterRequest {
        RegisterRequest {
            name: r.name.clone(),
            email: r.email.clone(),
            password: r.password.clone(),
            role: r.role.clone(),
            phone: r.phone.clone(),
            city: r.city.clone(),
            country: r.country.clone(),
        }
    }
}
