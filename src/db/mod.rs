use anyhow::Result;
use futures::future::BoxFuture;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{NewWorkOrder, Status, WorkOrder, WorkOrderPatch};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{User, hash_password, verify_password};

/// Error taxonomy of the record and credential stores.
///
/// Absent ids are deliberately not an error: lookups return `None` and
/// mutations return a zero row count instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An enum CHECK constraint rejected a value. Fatal to the call, nothing
    /// was written.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// A UNIQUE constraint rejected an insert (duplicate username).
    #[error("unique constraint violation: {0}")]
    UniqueViolation(String),

    /// The database stayed locked through every retry attempt.
    #[error("database busy after {0} attempts")]
    Busy(u32),

    #[error("blocking task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Retry attempts for transient "database is locked" contention.
const BUSY_RETRIES: u32 = 5;
const BUSY_BACKOFF: Duration = Duration::from_millis(50);

fn is_busy(err: &DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("database is locked") || msg.contains("database table is locked")
}

fn map_db_err(err: DbErr) -> StoreError {
    if matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    ) {
        return StoreError::UniqueViolation(err.to_string());
    }
    let msg = err.to_string();
    if msg.contains("CHECK constraint failed") {
        return StoreError::ConstraintViolation(msg);
    }
    StoreError::Database(err)
}

/// Runs one self-contained statement (or transaction), retrying a bounded
/// number of times while SQLite reports writer contention. Anything other
/// than a busy error surfaces immediately.
pub(crate) async fn with_busy_retry<T, F>(mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> BoxFuture<'static, Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if is_busy(&err) => {
                attempt += 1;
                if attempt >= BUSY_RETRIES {
                    return Err(StoreError::Busy(attempt));
                }
                debug!("database busy, retrying (attempt {attempt})");
                tokio::time::sleep(BUSY_BACKOFF * attempt).await;
            }
            Err(err) => return Err(map_db_err(err)),
        }
    }
}

/// Current UTC time, second precision, ISO-8601 with `Z` suffix. Every
/// timestamp persisted by the store goes through this.
#[must_use]
pub fn utc_now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn work_order_repo(&self) -> repositories::work_order::WorkOrderRepository {
        repositories::work_order::WorkOrderRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn add_work_order(&self, new: &NewWorkOrder) -> Result<i64, StoreError> {
        self.work_order_repo().create(new).await
    }

    pub async fn list_work_orders(
        &self,
        status: Option<Status>,
    ) -> Result<Vec<WorkOrder>, StoreError> {
        self.work_order_repo().list(status).await
    }

    pub async fn list_work_orders_by_machine(
        &self,
        machine_id: &str,
        status: Option<Status>,
    ) -> Result<Vec<WorkOrder>, StoreError> {
        self.work_order_repo()
            .list_by_machine(machine_id, status)
            .await
    }

    pub async fn get_work_order_by_id(&self, id: i64) -> Result<Option<WorkOrder>, StoreError> {
        self.work_order_repo().get_by_id(id).await
    }

    pub async fn update_work_order(
        &self,
        id: i64,
        patch: &WorkOrderPatch,
    ) -> Result<u64, StoreError> {
        self.work_order_repo().update(id, patch).await
    }

    pub async fn close_work_order(&self, id: i64) -> Result<u64, StoreError> {
        self.work_order_repo().close(id).await
    }

    pub async fn delete_all_work_orders(&self) -> Result<u64, StoreError> {
        self.work_order_repo().delete_all().await
    }

    pub async fn delete_work_orders_by_machine(&self, machine_id: &str) -> Result<u64, StoreError> {
        self.work_order_repo().delete_by_machine(machine_id).await
    }

    pub async fn delete_closed_older_than(&self, days: u32) -> Result<u64, StoreError> {
        self.work_order_repo().delete_closed_older_than(days).await
    }

    pub async fn count_work_orders(&self) -> Result<u64, StoreError> {
        self.work_order_repo().count().await
    }

    pub async fn ensure_user(
        &self,
        username: &str,
        password: &str,
        iterations: u32,
    ) -> Result<(), StoreError> {
        self.user_repo().ensure(username, password, iterations).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, StoreError> {
        self.user_repo().authenticate(username, password).await
    }
}
