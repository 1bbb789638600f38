use bcrypt::{hash, verify, HashParts, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PasswordConfig;
use crate::error::PasswordError;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Encoded bcrypt hash as stored alongside an account:
/// `$2b$<cost>$<salt><digest>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHash(String);

impl CredentialHash {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Cost embedded in the encoding, or `None` if the value is not a
    /// well-formed bcrypt hash.
    pub fn cost(&self) -> Option<u32> {
        self.0.parse::<HashParts>().ok().map(|parts| parts.get_cost())
    }
}

impl fmt::Display for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CredentialHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn from_config(config: &PasswordConfig) -> Result<Self, PasswordError> {
        Self::new(config.cost)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes with a fresh random salt. Only the first 72 bytes of the
    /// password take part in the digest.
    pub fn hash(&self, plaintext: &str) -> Result<CredentialHash, PasswordError> {
        let hashed = hash(plaintext, self.cost)?;
        Ok(CredentialHash::new(hashed))
    }

    /// Strict form of [`verify`](Self::verify): a stored value that cannot be
    /// parsed or re-derived is an error.
    pub fn check(&self, plaintext: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        Ok(verify(plaintext, stored_hash)?)
    }

    /// Returns `true` only when `plaintext` matches `stored_hash`. Malformed
    /// stored values never match.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        match self.check(plaintext, stored_hash) {
            Ok(is_valid) => is_valid,
            Err(e) => {
                log::warn!("Rejecting unusable password hash: {}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

pub fn hash_password(password: &str) -> Result<CredentialHash, PasswordError> {
    PasswordHasher::default().hash(password)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHasher::default().verify(password, hash)
}
