//! Concurrency stress: many writers hammering one SQLite file through the
//! pooled store. Exercises the busy-retry path; the invariant checked is that
//! no operation errors out and no insert goes missing.

use workorders::db::Store;
use workorders::models::{NewWorkOrder, Status};

const WORKERS: usize = 8;
const OPS_PER_WORKER: usize = 200;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_mixed_workload() {
    let db_path =
        std::env::temp_dir().join(format!("workorders-stress-test-{}.db", uuid::Uuid::new_v4()));
    let store = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open store");

    let mut handles = Vec::with_capacity(WORKERS);
    for worker in 0..WORKERS {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let mut created: Vec<i64> = Vec::new();

            for op in 0..OPS_PER_WORKER {
                let roll = rand::random_range(0..100u32);
                if roll < 70 {
                    let new = NewWorkOrder::new(
                        format!("KMT-{worker:02}"),
                        format!("stress op {op}"),
                    );
                    let id = store.add_work_order(&new).await.expect("add failed");
                    created.push(id);
                } else if roll < 90 {
                    store
                        .list_work_orders(Some(Status::Open))
                        .await
                        .expect("list failed");
                } else if let Some(&id) = created.last() {
                    // Zero rows affected is fine; another close may have won.
                    store.close_work_order(id).await.expect("close failed");
                }
            }

            created.len() as u64
        }));
    }

    let mut total_created = 0u64;
    for handle in handles {
        total_created += handle.await.expect("worker panicked");
    }

    assert_eq!(
        store.count_work_orders().await.expect("count failed"),
        total_created
    );

    // Every surviving row still satisfies the CHECK-backed vocabulary.
    for order in store.list_work_orders(None).await.expect("list failed") {
        assert!(matches!(order.status, Status::Open | Status::Closed));
        assert!(order.created_at.ends_with('Z'));
    }
}
