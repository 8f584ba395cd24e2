//! One-way adaptive password hashing (bcrypt).
//!
//! The credential store owns persistence; this module only turns plaintext
//! into a digest and checks plaintext against a stored digest.

use std::ops::RangeInclusive;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt cost {0} out of range")]
    InvalidCost(u32),
    #[error("password longer than {max} bytes", max = PasswordHasher::MAX_PASSWORD_BYTES)]
    TooLong,
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: Self::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    pub const DEFAULT_COST: u32 = 10;
    pub const COST_RANGE: RangeInclusive<u32> = 4..=31;
    /// bcrypt only looks at the first 72 bytes; longer input is refused instead of truncated.
    pub const MAX_PASSWORD_BYTES: usize = 72;

    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !Self::COST_RANGE.contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Salted digest in modular crypt format (`$2b$<cost>$...`).
    ///
    /// CPU-bound on purpose; async callers should use `spawn_blocking`.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        if plaintext.len() > Self::MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// `false` for a wrong password and for a digest that is not bcrypt.
    pub fn matches(&self, plaintext: &str, digest: &str) -> bool {
        if plaintext.len() > Self::MAX_PASSWORD_BYTES {
            return false;
        }
        match bcrypt::verify(plaintext, digest) {
            Ok(ok) => ok,
            Err(err) => {
                tracing::debug!(error = %err, "password digest could not be checked");
                false
            }
        }
    }
}
