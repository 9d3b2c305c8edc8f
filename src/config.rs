use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::db::repositories::user::{DEFAULT_ITERATIONS, MIN_ITERATIONS};

/// Default SQLite database filename used when no explicit path is given;
/// resolved relative to the current working directory.
pub const DB_FILENAME: &str = "workorders.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub security: SecurityConfig,

    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path to the SQLite database file.
    pub database_path: String,

    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: DB_FILENAME.to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// PBKDF2-HMAC-SHA256 iteration count; clamped to a floor of 100,000.
    pub pbkdf2_iterations: u32,

    /// Consecutive failures before the login gate locks.
    pub max_login_attempts: u32,

    /// Lockout duration once the attempt limit is reached.
    pub lockout_seconds: u64,

    /// Bootstrap admin credentials; with either missing no user is created.
    #[serde(skip_serializing)]
    pub admin_username: Option<String>,

    #[serde(skip_serializing)]
    pub admin_password: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: DEFAULT_ITERATIONS,
            max_login_attempts: 5,
            lockout_seconds: 30,
            admin_username: None,
            admin_password: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    #[serde(skip_serializing)]
    pub account_sid: Option<String>,

    #[serde(skip_serializing)]
    pub auth_token: Option<String>,

    pub from_number: Option<String>,

    pub to_number: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            security: SecurityConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the environment, reading `.env` first when
    /// one is present. Unset values fall back to the section defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(path) = std::env::var("WORKORDERS_DB") {
            config.general.database_path = path;
        }
        if let Ok(level) = std::env::var("WORKORDERS_LOG_LEVEL") {
            config.general.log_level = level;
        }

        if let Ok(raw) = std::env::var("WORKORDERS_PBKDF2_ITERATIONS") {
            let iterations: u32 = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("WORKORDERS_PBKDF2_ITERATIONS is not a number"))?;
            if iterations < MIN_ITERATIONS {
                warn!(
                    "Configured PBKDF2 iterations {} below floor, using {}",
                    iterations, MIN_ITERATIONS
                );
            }
            config.security.pbkdf2_iterations = iterations.max(MIN_ITERATIONS);
        }

        config.security.admin_username = std::env::var("WORKORDERS_ADMIN_USER").ok();
        config.security.admin_password = std::env::var("WORKORDERS_ADMIN_PASSWORD").ok();

        config.notify.account_sid = std::env::var("TWILIO_ACCOUNT_SID").ok();
        config.notify.auth_token = std::env::var("TWILIO_AUTH_TOKEN").ok();
        config.notify.from_number = std::env::var("TWILIO_FROM_NUMBER").ok();
        config.notify.to_number = std::env::var("ALERT_TO_NUMBER").ok();

        Ok(config)
    }

    /// Connection URL for the configured database path.
    #[must_use]
    pub fn database_url(&self) -> String {
        let path = &self.general.database_path;
        if path.starts_with("sqlite:") {
            path.clone()
        } else {
            format!("sqlite:{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_values() {
        let config = Config::default();
        assert_eq!(config.general.database_path, "workorders.db");
        assert_eq!(config.security.pbkdf2_iterations, 200_000);
        assert_eq!(config.security.max_login_attempts, 5);
        assert_eq!(config.security.lockout_seconds, 30);
        assert!(config.security.admin_username.is_none());
        assert!(config.notify.account_sid.is_none());
    }

    #[test]
    fn database_url_prefixes_plain_paths_once() {
        let mut config = Config::default();
        assert_eq!(config.database_url(), "sqlite:workorders.db");

        config.general.database_path = "sqlite:/tmp/a.db".to_string();
        assert_eq!(config.database_url(), "sqlite:/tmp/a.db");
    }
}
