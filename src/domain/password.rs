//! Credential hashing for stored account passwords.
//!
//! This module provides:
//! - Argon2id hashing into PHC strings (`$argon2id$v=19$...`)
//! - Verification against stored credentials
//!
//! # Legacy credentials
//!
//! Databases created by earlier releases store passwords verbatim. A stored
//! value that is not an Argon2 PHC string is compared by exact equality and
//! reported as [`Verification::MatchNeedsUpgrade`] so the caller can replace
//! it with a hash.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Errors while hashing a credential.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Outcome of checking a password against a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Password matches a hashed credential.
    Match,
    /// Password matches a plain-text credential that should be re-hashed.
    MatchNeedsUpgrade,
    Mismatch,
}

/// Argon2id with the OWASP baseline parameters (19 MiB, 2 passes, 1 lane).
fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(19_456, 2, 1, None)
        .map_err(|e| PasswordError::Hashing(format!("Invalid Argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password into a PHC string with a fresh random salt.
///
/// # Errors
/// Returns error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored credential.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> Verification {
    match PasswordHash::new(stored) {
        Ok(parsed) if parsed.algorithm.as_str().starts_with("argon2") => {
            // Parameters come from the PHC string, not from `hasher()`.
            if Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
            {
                Verification::Match
            } else {
                Verification::Mismatch
            }
        }
        _ if password == stored => Verification::MatchNeedsUpgrade,
        _ => Verification::Mismatch,
    }
}

/// Whether a stored credential is already an Argon2 hash.
#[must_use]
pub fn is_hashed(stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| parsed.algorithm.as_str().starts_with("argon2"))
        .unwrap_or(false)
}
