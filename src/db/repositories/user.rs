//! Credential storage: PBKDF2-HMAC-SHA256 hashing, constant-time
//! verification, and an idempotent single-admin bootstrap.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sha2::Sha256;
use std::sync::OnceLock;
use subtle::ConstantTimeEq;
use tokio::task;

use super::super::{StoreError, utc_now_iso, with_busy_retry};
use crate::entities::{prelude::*, users};

const ALGORITHM: &str = "pbkdf2_sha256";
const SALT_LEN: usize = 16;
const DERIVED_KEY_LEN: usize = 32;

/// Default iteration count. Overridable through config, but never below
/// [`MIN_ITERATIONS`].
pub const DEFAULT_ITERATIONS: u32 = 200_000;
pub const MIN_ITERATIONS: u32 = 100_000;

/// User data returned from the repository, without the password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            created_at: model.created_at,
        }
    }
}

/// Hashes a password with a fresh random 16-byte salt, encoded as
/// `pbkdf2_sha256$<iterations>$<salt b64>$<dk b64>`.
#[must_use]
pub fn hash_password(plaintext: &str, iterations: u32) -> String {
    let iterations = iterations.max(MIN_ITERATIONS);

    let mut rng = rand::rng();
    let salt: [u8; SALT_LEN] = rng.random();

    let mut derived = [0u8; DERIVED_KEY_LEN];
    pbkdf2_hmac::<Sha256>(plaintext.as_bytes(), &salt, iterations, &mut derived);

    format!(
        "{ALGORITHM}${iterations}${}${}",
        BASE64.encode(salt),
        BASE64.encode(derived)
    )
}

/// Recomputes the derived key with the embedded salt and iteration count and
/// compares in constant time. Any malformed encoding is simply `false`.
#[must_use]
pub fn verify_password(plaintext: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(algorithm), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if algorithm != ALGORITHM {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    if iterations == 0 {
        return false;
    }
    let Ok(salt) = BASE64.decode(salt) else {
        return false;
    };
    let Ok(expected) = BASE64.decode(expected) else {
        return false;
    };
    if expected.is_empty() {
        return false;
    }

    let mut derived = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(plaintext.as_bytes(), &salt, iterations, &mut derived);

    bool::from(derived.ct_eq(&expected))
}

/// Fixed hash verified against when the username does not exist, so the
/// unknown-user path costs the same PBKDF2 work as a wrong password.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("workorders-timing-pad", DEFAULT_ITERATIONS))
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_model(&self, username: &str) -> Result<Option<users::Model>, StoreError> {
        let conn = self.conn.clone();
        let username = username.to_string();

        with_busy_retry(move || {
            let conn = conn.clone();
            let username = username.clone();
            Box::pin(async move {
                Users::find()
                    .filter(users::Column::Username.eq(username))
                    .one(&conn)
                    .await
            })
        })
        .await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.find_model(username).await?.map(User::from))
    }

    /// Inserts the user only if the username does not already exist. The
    /// UNIQUE constraint is the authority: a concurrent first-run race that
    /// loses the insert is swallowed as a no-op.
    pub async fn ensure(
        &self,
        username: &str,
        password: &str,
        iterations: u32,
    ) -> Result<(), StoreError> {
        if self.find_model(username).await?.is_some() {
            return Ok(());
        }

        let password = password.to_string();
        let password_hash = task::spawn_blocking(move || hash_password(&password, iterations))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?;

        let conn = self.conn.clone();
        let username = username.to_string();

        let inserted = with_busy_retry(move || {
            let conn = conn.clone();
            let active = users::ActiveModel {
                username: Set(username.clone()),
                password_hash: Set(password_hash.clone()),
                created_at: Set(utc_now_iso()),
                ..Default::default()
            };
            Box::pin(async move { Users::insert(active).exec(&conn).await })
        })
        .await;

        match inserted {
            Ok(_) => Ok(()),
            // Lost the race to another first run; the row exists, done.
            Err(StoreError::UniqueViolation(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Verifies a username/password pair. Unknown usernames and wrong
    /// passwords both return `false` through the same code path, with the
    /// same PBKDF2 cost, so neither timing nor the result distinguishes them.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let user = self.find_model(username).await?;

        let password = password.to_string();
        let (encoded, known) = match user {
            Some(model) => (model.password_hash, true),
            None => (dummy_hash().to_string(), false),
        };

        let verified = task::spawn_blocking(move || verify_password(&password, &encoded))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?;

        Ok(verified && known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip() {
        let encoded = hash_password("hunter2", MIN_ITERATIONS);
        assert!(verify_password("hunter2", &encoded));
        assert!(!verify_password("hunter3", &encoded));
    }

    #[test]
    fn hash_has_expected_shape() {
        let encoded = hash_password("secret", MIN_ITERATIONS);
        let parts: Vec<&str> = encoded.split('$').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "pbkdf2_sha256");
        assert_eq!(parts[1], MIN_ITERATIONS.to_string());
        assert_eq!(BASE64.decode(parts[2]).unwrap().len(), SALT_LEN);
        assert_eq!(BASE64.decode(parts[3]).unwrap().len(), DERIVED_KEY_LEN);
    }

    #[test]
    fn iteration_floor_is_enforced() {
        let encoded = hash_password("secret", 1);
        let parts: Vec<&str> = encoded.split('$').collect();
        assert_eq!(parts[1], MIN_ITERATIONS.to_string());
    }

    #[test]
    fn malformed_encodings_verify_false() {
        let encoded = hash_password("secret", MIN_ITERATIONS);

        for bad in [
            "",
            "pbkdf2_sha256",
            "pbkdf2_sha256$100000$onlythree",
            "md5$100000$c2FsdA==$a2V5",
            "pbkdf2_sha256$notanumber$c2FsdA==$a2V5",
            "pbkdf2_sha256$0$c2FsdA==$a2V5",
            "pbkdf2_sha256$100000$!!notbase64!!$a2V5",
            "pbkdf2_sha256$100000$c2FsdA==$!!notbase64!!",
            &format!("{encoded}$extra"),
        ] {
            assert!(!verify_password("secret", bad), "accepted: {bad}");
        }
    }

    #[test]
    fn salts_are_random() {
        let a = hash_password("same", MIN_ITERATIONS);
        let b = hash_password("same", MIN_ITERATIONS);
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }
}
