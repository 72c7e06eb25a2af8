//! Password value object - Domain layer password handling.
//!
//! Hashing uses Argon2id with a salt per password. The cost is not global:
//! a [`PasswordHasher`] is built once from a [`HashCost`] and handed to
//! whoever needs to hash.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::constants::{
    DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB, DEFAULT_HASH_PARALLELISM,
};
use crate::error::{DomainError, DomainResult};

/// Tunable Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_HASH_MEMORY_KIB,
            iterations: DEFAULT_HASH_ITERATIONS,
            parallelism: DEFAULT_HASH_PARALLELISM,
        }
    }
}

/// Produces salted Argon2id hashes with a fixed cost.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher, rejecting cost values Argon2 does not accept.
    pub fn new(cost: HashCost) -> DomainResult<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| DomainError::internal(format!("Invalid password hash cost: {}", e)))?;
        Ok(Self { params })
    }

    /// Hash a plain text password.
    ///
    /// Length and strength are the caller's concern; see [`crate::UserRules`].
    pub fn hash(&self, plain_text: &str) -> DomainResult<Password> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(Password {
            hash: hash.to_string(),
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

/// Password value object holding a PHC-format hash.
#[derive(Clone, PartialEq, Eq)]
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
    /// The cost parameters are read back from the hash itself, so any hasher
    /// configuration verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::new(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "P@ssword123";
        let password = cheap_hasher().hash(plain).unwrap();

        assert_ne!(password.as_str(), plain);
        assert!(password.verify(plain));
        assert!(!password.verify("P@ssword124"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestP@ssword1";
        let hash = cheap_hasher().hash(plain).unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = cheap_hasher();
        let pass1 = hasher.hash("SameP@ss123").unwrap();
        let pass2 = hasher.hash("SameP@ss123").unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify("SameP@ss123"));
        assert!(pass2.verify("SameP@ss123"));
    }

    #[test]
    fn test_cost_is_encoded_in_hash() {
        let hash = cheap_hasher().hash("P@ssword123").unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hash.as_str().contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let result = PasswordHasher::new(HashCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_hash_does_not_verify() {
        assert!(!Password::from_hash("plaintext").verify("plaintext"));
    }
}
