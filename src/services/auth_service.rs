//! Domain service for the login gate.
//!
//! The gate is deliberately narrow: one boolean answer per attempt plus an
//! in-memory lockout counter. There is no session or token protocol.

use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username and wrong password are reported identically.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Locked out for {0} more seconds")]
    LockedOut(u64),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<crate::db::StoreError> for AuthError {
    fn from(err: crate::db::StoreError) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials, honoring the lockout policy.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on a bad username or
    /// password and [`AuthError::LockedOut`] while the gate is locked.
    async fn login(&self, username: &str, password: &str) -> Result<(), AuthError>;
}

/// Per-process failed-attempt counter with a fixed lockout window.
///
/// Scoped explicitly to whoever owns it (one CLI invocation, one session),
/// never shared ambient state. Resets on process restart by nature.
#[derive(Debug)]
pub struct LoginGate {
    max_attempts: u32,
    lockout: Duration,
    failures: u32,
    locked_until: Option<Instant>,
}

impl LoginGate {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_LOCKOUT: Duration = Duration::from_secs(30);

    #[must_use]
    pub const fn new() -> Self {
        Self::with_policy(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_LOCKOUT)
    }

    #[must_use]
    pub const fn with_policy(max_attempts: u32, lockout: Duration) -> Self {
        Self {
            max_attempts,
            lockout,
            failures: 0,
            locked_until: None,
        }
    }

    /// Remaining lockout, if the gate is currently locked.
    #[must_use]
    pub fn locked_for(&self) -> Option<Duration> {
        let until = self.locked_until?;
        let now = Instant::now();
        if now < until { Some(until - now) } else { None }
    }

    /// Records a failed attempt; the counter is consecutive, so reaching the
    /// limit arms the lockout timer and resets it.
    pub fn record_failure(&mut self) {
        self.failures += 1;
        if self.failures >= self.max_attempts {
            self.locked_until = Some(Instant::now() + self.lockout);
            self.failures = 0;
        }
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
        self.locked_until = None;
    }
}

impl Default for LoginGate {
    fn default() -> Self {
        Self::new()
    }
}
