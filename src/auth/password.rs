//! Argon2 password hashing and verification.
//!
//! Hashes are PHC strings with a per-hash random salt. Plaintext passwords
//! exist only transiently inside these functions and the login handler.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::ApiError;

/// Hashes a plaintext password into a PHC string.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Verifies a plaintext password against a stored PHC hash.
///
/// A wrong password is `Ok(false)`, not an error; only an unparseable
/// stored hash is an error.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the stored hash is not a valid PHC
/// string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("stored password hash invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let hash = hash_password("correct horse").unwrap_or_default();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).unwrap_or(false));
        assert!(!verify_password("battery staple", &hash).unwrap_or(true));
    }

    #[test]
    fn salts_differ() {
        let a = hash_password("same").unwrap_or_default();
        let b = hash_password("same").unwrap_or_default();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }
}
