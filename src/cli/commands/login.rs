use std::process::ExitCode;
use std::time::Duration;

use crate::config::Config;
use crate::db::Store;
use crate::services::auth_service::{AuthError, AuthService, LoginGate};
use crate::services::auth_service_impl::{SeaOrmAuthService, ensure_admin};

pub async fn cmd_login(
    config: &Config,
    username: &str,
    password: &str,
) -> anyhow::Result<ExitCode> {
    let store = Store::new(&config.database_url()).await?;

    ensure_admin(config, &store).await?;

    let gate = LoginGate::with_policy(
        config.security.max_login_attempts,
        Duration::from_secs(config.security.lockout_seconds),
    );
    let auth = SeaOrmAuthService::new(store, gate);

    match auth.login(username, password).await {
        Ok(()) => {
            println!("Login OK");
            Ok(ExitCode::SUCCESS)
        }
        Err(AuthError::InvalidCredentials) => {
            println!("Login denied");
            Ok(ExitCode::from(1))
        }
        Err(AuthError::LockedOut(seconds)) => {
            println!("Locked out; retry in {seconds}s");
            Ok(ExitCode::from(1))
        }
        Err(err) => Err(err.into()),
    }
}
