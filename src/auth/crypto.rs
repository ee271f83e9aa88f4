//! # Password Hashing
//!
//! Salted Argon2id hashes with a fixed work factor.
//!
//! ## Invariants
//! - Passwords are only ever stored as [`PasswordHash`] values
//! - Verification compares in constant time (inside the argon2 crate)

use std::fmt;
use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};

/// Memory cost in KiB
pub const MEMORY_COST_KIB: u32 = 19 * 1024;

/// Number of passes
pub const TIME_COST: u32 = 2;

/// Degree of parallelism
pub const PARALLELISM: u32 = 1;

/// A one-way password hash in PHC string format
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

fn hasher() -> AuthResult<Argon2<'static>> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|_| AuthError::HashingFailed)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password.
///
/// CPU-bound; async callers should run this on a blocking thread.
pub fn hash_password(password: &str) -> AuthResult<PasswordHash> {
    let salt = SaltString::generate(&mut OsRng);

    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordHash(hash.to_string()))
        .map_err(|_| AuthError::HashingFailed)
}

/// Verify a password against its hash.
///
/// The parameters stored in the hash itself drive the recomputation.
pub fn verify_password(password: &str, hash: &PasswordHash) -> AuthResult<bool> {
    let parsed = PhcHash::new(hash.as_str()).map_err(|_| AuthError::InvalidCredentials)?;

    Ok(hasher()?
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

static DUMMY: OnceLock<PasswordHash> = OnceLock::new();

/// Hash used to spend the same verification time when no user matched.
///
/// Computed on first use; call it once at startup so no request pays for it.
pub fn dummy_hash() -> &'static PasswordHash {
    DUMMY.get_or_init(|| {
        hash_password("dummy password for unknown users")
            .unwrap_or_else(|_| PasswordHash(String::new()))
    })
}

/// Whether [`dummy_hash`] has already been computed
pub fn dummy_hash_ready() -> bool {
    DUMMY.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = "secure_password_123";
        let hash = hash_password(password).unwrap();

        // Hash should be different from password
        assert_ne!(hash.as_str(), password);
        assert!(hash.as_str().starts_with("$argon2id$"));

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_password_hash_produces_unique_hashes() {
        let password = "same_password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Same password should produce different hashes (due to salt)
        assert_ne!(hash1, hash2);

        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_work_factor_is_recorded_in_hash() {
        let hash = hash_password("longenough1").unwrap();
        let expected = format!("m={},t={},p={}", MEMORY_COST_KIB, TIME_COST, PARALLELISM);
        assert!(hash.as_str().contains(&expected));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        let bogus: PasswordHash = serde_json::from_str("\"plaintext\"").unwrap();
        assert_eq!(
            verify_password("plaintext", &bogus),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let hash = hash_password("longenough1").unwrap();
        assert_eq!(format!("{:?}", hash), "PasswordHash(..)");
    }

    #[test]
    fn test_dummy_hash_never_matches_user_input() {
        assert!(!verify_password("longenough1", dummy_hash()).unwrap());
    }
}
