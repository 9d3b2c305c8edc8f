//! Migration tests: opening a database created by an earlier schema revision
//! must upgrade it in place without losing rows.

use sea_orm::{ConnectionTrait, Database, Statement};

use workorders::db::Store;
use workorders::models::Status;

/// Builds a database with the original 7-column `work_orders` table, as laid
/// down before `assigned_to`, `notes`, and `updated_at` existed, plus a few
/// rows.
async fn seed_legacy_db(db_path: &std::path::Path) {
    std::fs::File::create(db_path).expect("failed to create db file");

    let conn = Database::connect(format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to connect");
    let backend = conn.get_database_backend();

    let ddl = r"
        CREATE TABLE work_orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            machine_id TEXT NOT NULL,
            issue TEXT NOT NULL,
            priority TEXT NOT NULL CHECK(priority IN ('low','med','high')),
            status TEXT NOT NULL CHECK(status IN ('open','closed')),
            created_at TEXT NOT NULL,
            closed_at TEXT
        );
    ";
    conn.execute(Statement::from_string(backend, ddl.to_string()))
        .await
        .expect("legacy DDL failed");

    let rows = r"
        INSERT INTO work_orders (machine_id, issue, priority, status, created_at, closed_at)
        VALUES
            ('KMT-101', 'Belt worn', 'low', 'open', '2024-01-10T08:00:00Z', NULL),
            ('KMT-102', 'Hydraulic leak', 'high', 'closed', '2024-01-11T09:00:00Z', '2024-01-12T10:00:00Z');
    ";
    conn.execute(Statement::from_string(backend, rows.to_string()))
        .await
        .expect("legacy insert failed");
}

#[tokio::test]
async fn test_legacy_db_is_upgraded_on_open() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let db_path = dir.path().join("legacy.db");
    seed_legacy_db(&db_path).await;

    let store = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("open failed");

    let orders = store.list_work_orders(None).await.expect("list failed");
    assert_eq!(orders.len(), 2);

    let open = orders
        .iter()
        .find(|o| o.machine_id == "KMT-101")
        .expect("open row missing");
    assert_eq!(open.status, Status::Open);
    assert!(open.assigned_to.is_none());
    assert!(open.notes.is_none());
    // Backfill: open rows take created_at.
    assert_eq!(open.updated_at, "2024-01-10T08:00:00Z");

    let closed = orders
        .iter()
        .find(|o| o.machine_id == "KMT-102")
        .expect("closed row missing");
    assert_eq!(closed.status, Status::Closed);
    // Backfill: closed rows take closed_at.
    assert_eq!(closed.updated_at, "2024-01-12T10:00:00Z");
}

#[tokio::test]
async fn test_upgraded_db_accepts_new_columns() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let db_path = dir.path().join("legacy.db");
    seed_legacy_db(&db_path).await;

    let url = format!("sqlite:{}", db_path.display());
    let store = Store::new(&url).await.expect("open failed");

    let new = workorders::models::NewWorkOrder::new("KMT-103", "Spindle noise")
        .assigned_to("dana")
        .notes("after upgrade");
    let id = store.add_work_order(&new).await.expect("add failed");

    let order = store
        .get_work_order_by_id(id)
        .await
        .expect("get failed")
        .expect("order missing");
    assert_eq!(order.assigned_to.as_deref(), Some("dana"));
    assert_eq!(order.notes.as_deref(), Some("after upgrade"));
}

#[tokio::test]
async fn test_reopening_an_upgraded_db_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let db_path = dir.path().join("legacy.db");
    seed_legacy_db(&db_path).await;

    let url = format!("sqlite:{}", db_path.display());
    {
        let store = Store::new(&url).await.expect("first open failed");
        assert_eq!(store.count_work_orders().await.expect("count"), 2);
    }

    let store = Store::new(&url).await.expect("second open failed");
    assert_eq!(store.count_work_orders().await.expect("count"), 2);
}
