// Validation utilities module
// Provides custom validation functions for domain-specific rules

use validator::ValidationError;

/// Validates that a role is one of the accepted values
/// Valid values: "Admin", "Staff" (case-sensitive)
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    match role {
        "Admin" | "Staff" => Ok(()),
        _ => Err(ValidationError::new("invalid_role")),
    }
}
