//! Integration tests for the credential store and the lockout-gated login
//! service.

use std::time::Duration;

use workorders::db::Store;
use workorders::services::{AuthError, AuthService, LoginGate, SeaOrmAuthService, ensure_admin};
use workorders::Config;

const TEST_ITERATIONS: u32 = 100_000;

async fn spawn_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("workorders-auth-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open store")
}

#[tokio::test]
async fn test_ensure_user_then_authenticate() {
    let store = spawn_store().await;

    store
        .ensure_user("admin", "hunter2", TEST_ITERATIONS)
        .await
        .expect("ensure failed");

    let user = store
        .get_user_by_username("admin")
        .await
        .expect("get failed")
        .expect("user missing");
    assert_eq!(user.username, "admin");
    assert!(user.created_at.ends_with('Z'));

    assert!(
        store
            .authenticate_user("admin", "hunter2")
            .await
            .expect("auth failed")
    );
    assert!(
        !store
            .authenticate_user("admin", "hunter3")
            .await
            .expect("auth failed")
    );
}

#[tokio::test]
async fn test_unknown_user_authenticates_false() {
    let store = spawn_store().await;
    assert!(
        !store
            .authenticate_user("nobody", "anything")
            .await
            .expect("auth failed")
    );
}

#[tokio::test]
async fn test_ensure_user_is_idempotent_and_keeps_first_password() {
    let store = spawn_store().await;

    store
        .ensure_user("admin", "first", TEST_ITERATIONS)
        .await
        .expect("ensure failed");
    store
        .ensure_user("admin", "second", TEST_ITERATIONS)
        .await
        .expect("ensure failed");

    assert!(
        store
            .authenticate_user("admin", "first")
            .await
            .expect("auth failed")
    );
    assert!(
        !store
            .authenticate_user("admin", "second")
            .await
            .expect("auth failed")
    );
}

#[tokio::test]
async fn test_login_service_accepts_and_rejects() {
    let store = spawn_store().await;
    store
        .ensure_user("admin", "hunter2", TEST_ITERATIONS)
        .await
        .expect("ensure failed");

    let auth = SeaOrmAuthService::new(store, LoginGate::default());

    auth.login("admin", "hunter2").await.expect("login failed");

    let err = auth
        .login("admin", "wrong")
        .await
        .expect_err("should reject");
    assert!(matches!(err, AuthError::InvalidCredentials), "{err}");

    // Unknown usernames report the same error as wrong passwords.
    let err = auth
        .login("nobody", "hunter2")
        .await
        .expect_err("should reject");
    assert!(matches!(err, AuthError::InvalidCredentials), "{err}");
}

#[tokio::test]
async fn test_login_service_locks_after_repeated_failures() {
    let store = spawn_store().await;
    store
        .ensure_user("admin", "hunter2", TEST_ITERATIONS)
        .await
        .expect("ensure failed");

    let gate = LoginGate::with_policy(3, Duration::from_secs(30));
    let auth = SeaOrmAuthService::new(store, gate);

    for _ in 0..3 {
        let err = auth
            .login("admin", "wrong")
            .await
            .expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidCredentials), "{err}");
    }

    // Gate is now armed; even the right password bounces off it.
    let err = auth
        .login("admin", "hunter2")
        .await
        .expect_err("should be locked");
    assert!(matches!(err, AuthError::LockedOut(_)), "{err}");
}

#[tokio::test]
async fn test_login_service_recovers_after_lockout_expires() {
    let store = spawn_store().await;
    store
        .ensure_user("admin", "hunter2", TEST_ITERATIONS)
        .await
        .expect("ensure failed");

    let gate = LoginGate::with_policy(1, Duration::from_millis(50));
    let auth = SeaOrmAuthService::new(store, gate);

    auth.login("admin", "wrong")
        .await
        .expect_err("should reject");
    let err = auth
        .login("admin", "hunter2")
        .await
        .expect_err("should be locked");
    assert!(matches!(err, AuthError::LockedOut(_)), "{err}");

    tokio::time::sleep(Duration::from_millis(80)).await;

    auth.login("admin", "hunter2")
        .await
        .expect("lockout should have expired");
}

#[tokio::test]
async fn test_ensure_admin_bootstraps_from_config() {
    let store = spawn_store().await;

    let mut config = Config::default();
    config.security.admin_username = Some("ops".to_string());
    config.security.admin_password = Some("hunter2".to_string());
    config.security.pbkdf2_iterations = TEST_ITERATIONS;

    ensure_admin(&config, &store).await.expect("bootstrap failed");

    assert!(
        store
            .authenticate_user("ops", "hunter2")
            .await
            .expect("auth failed")
    );
}

#[tokio::test]
async fn test_ensure_admin_without_credentials_is_a_no_op() {
    let store = spawn_store().await;

    let config = Config::default();
    ensure_admin(&config, &store).await.expect("should not fail");

    assert!(
        store
            .get_user_by_username("admin")
            .await
            .expect("get failed")
            .is_none()
    );
}
