//! Password value object - one-way credential hashing.
//!
//! Hashes are Argon2id PHC strings carrying their own random salt and
//! parameters, so a stored digest verifies even if the defaults change.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::constants::{HASH_MEMORY_COST_KIB, HASH_PARALLELISM, HASH_TIME_COST};
use crate::error::{DomainError, DomainResult};

/// Password value object that handles hashing and verification.
///
/// Holds only the digest; the plaintext never outlives the call that hashes it.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Deliberately slow; call from a blocking-capable context.
    ///
    /// # Errors
    /// Returns `HashingFailure` if the hasher cannot be configured or the
    /// underlying computation fails.
    pub fn hash(plain_text: &str) -> DomainResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()?
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|_| DomainError::HashingFailure)?;
        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Create a Password from an existing hash (from storage).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// Returns false for malformed digests instead of failing.
    pub fn verify(&self, plain_text: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };
        let Ok(argon2) = Self::argon2() else {
            return false;
        };
        argon2.verify_password(plain_text.as_bytes(), &parsed).is_ok()
    }

    fn argon2() -> DomainResult<Argon2<'static>> {
        let params = Params::new(HASH_MEMORY_COST_KIB, HASH_TIME_COST, HASH_PARALLELISM, None)
            .map_err(|_| DomainError::HashingFailure)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
