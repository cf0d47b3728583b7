//! Randomness and time capabilities used by the signer.
//!
//! Nonce generation and timestamp reads are the only impure steps of signing.
//! They sit behind [`NonceSource`] and [`Clock`] so tests can pin them.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::AuthError;

/// A source of cryptographically secure random bytes.
pub trait NonceSource: Send + Sync + fmt::Debug {
    /// Fill `buf` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RandomSource`] if entropy cannot be read.
    fn fill(&self, buf: &mut [u8]) -> Result<(), AuthError>;
}

/// A source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Operating-system entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AuthError> {
        getrandom::fill(buf).map_err(|e| AuthError::RandomSource(e.to_string()))
    }
}

/// Repeats a fixed byte pattern. Only useful for tests and fixtures.
#[derive(Debug, Clone)]
pub struct FixedNonceSource {
    bytes: Vec<u8>,
}

impl FixedNonceSource {
    /// Create a source that cycles through `bytes`.
    ///
    /// An empty pattern fills with zeros.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl NonceSource for FixedNonceSource {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AuthError> {
        if self.bytes.is_empty() {
            buf.fill(0);
            return Ok(());
        }
        for (dst, src) in buf.iter_mut().zip(self.bytes.iter().cycle()) {
            *dst = *src;
        }
        Ok(())
    }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
