//! Salted password hashing with Argon2id
//!
//! Hashes are stored in PHC string format, so the salt and parameters travel
//! with the hash and verification needs nothing else.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use uuid::Uuid;

use super::AuthError;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a password against a stored hash; malformed hashes never match
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_original_password() {
        let hash = hash_password("testpass").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("testpass", &hash));
    }

    #[test]
    fn test_wrong_password_does_not_verify() {
        let hash = hash_password("testpass").unwrap();
        assert!(!verify_password("testpass2", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret", &a));
        assert!(verify_password("secret", &b));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password("secret", "not-a-hash"));
        assert!(!verify_password("secret", "secret"));
    }
}
