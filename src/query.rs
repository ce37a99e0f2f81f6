use serde::Deserialize;

/// SQL query builder for the user search endpoint
/// Produces a single parameterized SELECT with optional filters
pub struct UserQueryBuilder {
    where_clauses: Vec<String>,
    params: Vec<String>,
}

impl UserQueryBuilder {
    /// Creates an empty builder selecting every user
    pub fn new() -> Self {
        Self {
            where_clauses: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Adds a substring filter matching name OR email (case-insensitive)
    /// Uses ILIKE for PostgreSQL case-insensitive pattern matching
    pub fn add_name_or_email_filter(&mut self, term: &str) {
        let first = self.params.len() + 1;
        self.where_clauses
            .push(format!("(name ILIKE ${} OR email ILIKE ${})", first, first + 1));

        let pattern = format!("%{}%", term);
        self.params.push(pattern.clone());
        self.params.push(pattern);
    }

    /// Adds an exact country filter (case-insensitive)
    pub fn add_country_filter(&mut self, country: &str) {
        let param_index = self.params.len() + 1;
        self.where_clauses
            .push(format!("country ILIKE ${}", param_index));
        self.params.push(country.to_string());
    }

    /// Builds the final SQL query string with all parameters
    /// Returns a tuple of (query_string, parameters)
    pub fn build(&self) -> (String, Vec<String>) {
        let mut query = String::from(
            "SELECT id, name, email, password_hash, role, phone, city, country, created_at FROM users",
        );

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        query.push_str(" ORDER BY id");

        (query, self.params.clone())
    }
}

impl Default for UserQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters accepted by the user listing endpoint
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Search term matched against name or email
    pub q: Option<String>,
    /// Country filter (case-insensitive exact match)
    pub country: Option<String>,
}

/// Normalized query parameters with validation applied
#[derive(Debug)]
pub struct ValidatedQuery {
    /// Normalized search term (trimmed, None if empty)
    pub q: Option<String>,
    /// Normalized country filter (trimmed, None if empty)
    pub country: Option<String>,
}

/// Validation error type
#[derive(Debug)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

const MAX_FILTER_LENGTH: usize = 100;

/// Query parameter validator
pub struct QueryValidator;

impl QueryValidator {
    /// Validates and normalizes query parameters
    pub fn validate(params: QueryParams) -> Result<ValidatedQuery, ValidationError> {
        let q = Self::normalize_string(params.q);
        let country = Self::normalize_string(params.country);

        if let Some(ref term) = q {
            Self::validate_length(term, "q")?;
        }
        if let Some(ref country) = country {
            Self::validate_length(country, "country")?;
        }

        Ok(ValidatedQuery { q, country })
    }

    /// Normalizes string parameters by trimming whitespace
    /// Returns None if the string is empty or whitespace-only
    fn normalize_string(s: Option<String>) -> Option<String> {
        s.and_then(|s| {
            let trimmed = s.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        })
    }

    fn validate_length(value: &str, param_name: &str) -> Result<(), ValidationError> {
        if value.len() > MAX_FILTER_LENGTH {
            return Err(ValidationError {
                message: format!("{} must be at most {} characters", param_name, MAX_FILTER_LENGTH),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_filters() {
        let builder = UserQueryBuilder::new();
        let (query, params) = builder.build();

        assert_eq!(
            query,
            "SELECT id, name, email, password_hash, role, phone, city, country, created_at FROM users ORDER BY id"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_search_filter_matches_name_or_email() {
        let mut builder = UserQueryBuilder::new();
        builder.add_name_or_email_filter("ali");
        let (query, params) = builder.build();

        assert!(query.contains("WHERE (name ILIKE $1 OR email ILIKE $2)"));
        assert_eq!(params, vec!["%ali%".to_string(), "%ali%".to_string()]);
    }

    #[test]
    fn test_country_filter_alone() {
        let mut builder = UserQueryBuilder::new();
        builder.add_country_filter("Algeria");
        let (query, params) = builder.build();

        assert!(query.contains("WHERE country ILIKE $1"));
        assert_eq!(params, vec!["Algeria".to_string()]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let mut builder = UserQueryBuilder::new();
        builder.add_name_or_email_filter("ali");
        builder.add_country_filter("Algeria");
        let (query, params) = builder.build();

        assert!(query.contains("(name ILIKE $1 OR email ILIKE $2) AND country ILIKE $3"));
        assert_eq!(params.len(), 3);
        assert!(query.ends_with("ORDER BY id"));
    }

    #[test]
    fn test_validator_normalizes_empty_to_none() {
        let validated = QueryValidator::validate(QueryParams {
            q: Some("   ".to_string()),
            country: Some("".to_string()),
        })
        .unwrap();

        assert!(validated.q.is_none());
        assert!(validated.country.is_none());
    }

    #[test]
    fn test_validator_trims_filters() {
        let validated = QueryValidator::validate(QueryParams {
            q: Some("  ali ".to_string()),
            country: Some(" Algeria".to_string()),
        })
        .unwrap();

        assert_eq!(validated.q.as_deref(), Some("ali"));
        assert_eq!(validated.country.as_deref(), Some("Algeria"));
    }

    #[test]
    fn test_validator_rejects_overlong_filters() {
        let result = QueryValidator::validate(QueryParams {
            q: Some("x".repeat(MAX_FILTER_LENGTH + 1)),
            country: None,
        });

        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("q must be at most"));
    }
}
