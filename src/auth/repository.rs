// Database repository for user records

use sqlx::PgPool;

use crate::auth::{
    error::AuthError,
    models::{NewUser, User},
};
use crate::query::UserQueryBuilder;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, phone, city, country, created_at";

/// User repository for database operations
///
/// The only component that touches the users table; everything above it
/// works with [`User`] values.
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user record
    ///
    /// The unique index on LOWER(email) makes the insert an atomic
    /// check-and-insert; a constraint violation surfaces as
    /// `EmailAlreadyExists` so concurrent registrations cannot both win.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, role, phone, city, country) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, name, email, password_hash, role, phone, city, country, created_at",
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .bind(&new_user.phone)
        .bind(&new_user.city)
        .bind(&new_user.country)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    /// Check if an email is already registered (case-insensitive)
    pub async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(exists.0)
    }

    /// Search users by name/email substring and/or exact country
    ///
    /// Both filters are optional and combine with AND; matching is
    /// case-insensitive. Results are ordered by id.
    pub async fn search(
        &self,
        term: Option<&str>,
        country: Option<&str>,
    ) -> Result<Vec<User>, AuthError> {
        let mut builder = UserQueryBuilder::new();
        if let Some(term) = term {
            builder.add_name_or_email_filter(term);
        }
        if let Some(country) = country {
            builder.add_country_filter(country);
        }

        let (sql, params) = builder.build();
        let mut query = sqlx::query_as::<_, User>(&sql);
        for param in params {
            query = query.bind(param);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }
}
