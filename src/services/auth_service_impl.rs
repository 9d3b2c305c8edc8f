//! Store-backed implementation of the `AuthService` trait.

use std::sync::Mutex;
use tracing::warn;

use crate::config::Config;
use crate::db::Store;
use crate::services::auth_service::{AuthError, AuthService, LoginGate};

pub struct SeaOrmAuthService {
    store: Store,
    gate: Mutex<LoginGate>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, gate: LoginGate) -> Self {
        Self {
            store,
            gate: Mutex::new(gate),
        }
    }
}

#[async_trait::async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        {
            let gate = self.gate.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(remaining) = gate.locked_for() {
                return Err(AuthError::LockedOut(remaining.as_secs().max(1)));
            }
        }

        let verified = self.store.authenticate_user(username, password).await?;

        let mut gate = self.gate.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if verified {
            gate.record_success();
            Ok(())
        } else {
            gate.record_failure();
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Bootstraps the admin account from configuration. Idempotent: an existing
/// username is left untouched. With incomplete credentials nothing is
/// created and login stays impossible, which is warned about but not fatal.
pub async fn ensure_admin(config: &Config, store: &Store) -> Result<(), AuthError> {
    let (Some(username), Some(password)) = (
        config.security.admin_username.as_deref(),
        config.security.admin_password.as_deref(),
    ) else {
        warn!("Admin credentials not configured; no user will be created and login is disabled");
        return Ok(());
    };

    store
        .ensure_user(username, password, config.security.pbkdf2_iterations)
        .await?;
    Ok(())
}
