// Password hashing and verification

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::auth::error::AuthError;

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a per-call random salt
    ///
    /// The output is a PHC string embedding algorithm parameters and salt,
    /// so two calls on the same password produce different digests.
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    /// Verify a password against a stored PHC hash
    ///
    /// Comparison is constant-time with respect to the password. A hash
    /// that fails to parse verifies as false rather than erroring.
    pub fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = PasswordService::hash_password("secret1").unwrap();
        assert!(PasswordService::verify_password("secret1", &hash));
    }

    #[test]
    fn test_wrong_password_fails_verification() {
        let hash = PasswordService::hash_password("secret1").unwrap();
        assert!(!PasswordService::verify_password("secret2", &hash));
        assert!(!PasswordService::verify_password("", &hash));
    }

    #[test]
    fn test_hashing_is_salted_per_call() {
        let first = PasswordService::hash_password("secret1").unwrap();
        let second = PasswordService::hash_password("secret1").unwrap();

        // Different salts, different digests, both still verify
        assert_ne!(first, second);
        assert!(PasswordService::verify_password("secret1", &first));
        assert!(PasswordService::verify_password("secret1", &second));
    }

    #[test]
    fn test_hash_output_is_phc_format() {
        let hash = PasswordService::hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        // The raw password never appears in the digest
        assert!(!hash.contains("secret1"));
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        assert!(!PasswordService::verify_password("secret1", ""));
        assert!(!PasswordService::verify_password("secret1", "not-a-phc-string"));
        assert!(!PasswordService::verify_password("secret1", "$argon2id$broken"));
    }
}
