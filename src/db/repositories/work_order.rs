use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::warn;

use super::super::{StoreError, utc_now_iso, with_busy_retry};
use crate::entities::{prelude::*, work_orders};
use crate::models::{NewWorkOrder, Priority, Status, WorkOrder, WorkOrderPatch};

pub struct WorkOrderRepository {
    conn: DatabaseConnection,
}

impl WorkOrderRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: work_orders::Model) -> Result<WorkOrder, StoreError> {
        let priority = Priority::parse(&model.priority).ok_or_else(|| {
            StoreError::ConstraintViolation(format!("unknown priority '{}'", model.priority))
        })?;
        let status = Status::parse(&model.status).ok_or_else(|| {
            StoreError::ConstraintViolation(format!("unknown status '{}'", model.status))
        })?;

        Ok(WorkOrder {
            id: model.id,
            machine_id: model.machine_id,
            issue: model.issue,
            priority,
            status,
            // Rows older than the updated_at column are backfilled on open,
            // but fall back to created_at rather than trust that.
            updated_at: model.updated_at.unwrap_or_else(|| model.created_at.clone()),
            created_at: model.created_at,
            closed_at: model.closed_at,
            assigned_to: model.assigned_to,
            notes: model.notes,
        })
    }

    /// Inserts a new open work order and returns its id. An out-of-range
    /// priority is rejected by the CHECK constraint; nothing is written.
    pub async fn create(&self, new: &NewWorkOrder) -> Result<i64, StoreError> {
        let conn = self.conn.clone();
        let new = new.clone();

        let result = with_busy_retry(move || {
            let conn = conn.clone();
            let new = new.clone();
            Box::pin(async move {
                let now = utc_now_iso();
                let active = work_orders::ActiveModel {
                    machine_id: Set(new.machine_id),
                    issue: Set(new.issue),
                    priority: Set(new.priority),
                    status: Set(Status::Open.as_str().to_string()),
                    created_at: Set(now.clone()),
                    closed_at: Set(None),
                    updated_at: Set(Some(now)),
                    assigned_to: Set(new.assigned_to),
                    notes: Set(new.notes),
                    ..Default::default()
                };
                WorkOrders::insert(active).exec(&conn).await
            })
        })
        .await?;

        Ok(result.last_insert_id)
    }

    /// All work orders, newest id first, optionally restricted to one status.
    pub async fn list(&self, status: Option<Status>) -> Result<Vec<WorkOrder>, StoreError> {
        let conn = self.conn.clone();

        let rows = with_busy_retry(move || {
            let conn = conn.clone();
            Box::pin(async move {
                let mut query =
                    WorkOrders::find().order_by_desc(work_orders::Column::Id);
                if let Some(status) = status {
                    query = query.filter(work_orders::Column::Status.eq(status.as_str()));
                }
                query.all(&conn).await
            })
        })
        .await?;

        rows.into_iter().map(Self::map_model).collect()
    }

    /// Same ordering and status semantics as `list`, scoped to one machine.
    pub async fn list_by_machine(
        &self,
        machine_id: &str,
        status: Option<Status>,
    ) -> Result<Vec<WorkOrder>, StoreError> {
        let conn = self.conn.clone();
        let machine_id = machine_id.to_string();

        let rows = with_busy_retry(move || {
            let conn = conn.clone();
            let machine_id = machine_id.clone();
            Box::pin(async move {
                let mut query = WorkOrders::find()
                    .filter(work_orders::Column::MachineId.eq(machine_id))
                    .order_by_desc(work_orders::Column::Id);
                if let Some(status) = status {
                    query = query.filter(work_orders::Column::Status.eq(status.as_str()));
                }
                query.all(&conn).await
            })
        })
        .await?;

        rows.into_iter().map(Self::map_model).collect()
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<WorkOrder>, StoreError> {
        let conn = self.conn.clone();

        let row = with_busy_retry(move || {
            let conn = conn.clone();
            Box::pin(async move { WorkOrders::find_by_id(id).one(&conn).await })
        })
        .await?;

        row.map(Self::map_model).transpose()
    }

    /// Applies a partial update. An empty patch is a no-op returning 0 with
    /// no timestamp bump; any supplied field bumps `updated_at` even when the
    /// stored value would not change.
    pub async fn update(&self, id: i64, patch: &WorkOrderPatch) -> Result<u64, StoreError> {
        if patch.is_empty() {
            return Ok(0);
        }

        let conn = self.conn.clone();
        let patch = patch.clone();

        let result = with_busy_retry(move || {
            let conn = conn.clone();
            let patch = patch.clone();
            Box::pin(async move {
                let mut update = WorkOrders::update_many()
                    .col_expr(work_orders::Column::UpdatedAt, Expr::value(utc_now_iso()))
                    .filter(work_orders::Column::Id.eq(id));

                if let Some(issue) = patch.issue {
                    update = update.col_expr(work_orders::Column::Issue, Expr::value(issue));
                }
                if let Some(priority) = patch.priority {
                    update = update
                        .col_expr(work_orders::Column::Priority, Expr::value(priority.as_str()));
                }
                if let Some(assigned_to) = patch.assigned_to {
                    update = update
                        .col_expr(work_orders::Column::AssignedTo, Expr::value(assigned_to));
                }
                if let Some(notes) = patch.notes {
                    update = update.col_expr(work_orders::Column::Notes, Expr::value(notes));
                }

                update.exec(&conn).await
            })
        })
        .await?;

        Ok(result.rows_affected)
    }

    /// Transitions an open order to closed, setting `closed_at` and
    /// `updated_at` to now. Absent or already-closed ids affect 0 rows;
    /// callers treat that as a no-op, not an error.
    pub async fn close(&self, id: i64) -> Result<u64, StoreError> {
        let conn = self.conn.clone();

        let result = with_busy_retry(move || {
            let conn = conn.clone();
            Box::pin(async move {
                let now = utc_now_iso();
                WorkOrders::update_many()
                    .col_expr(
                        work_orders::Column::Status,
                        Expr::value(Status::Closed.as_str()),
                    )
                    .col_expr(work_orders::Column::ClosedAt, Expr::value(now.clone()))
                    .col_expr(work_orders::Column::UpdatedAt, Expr::value(now))
                    .filter(work_orders::Column::Id.eq(id))
                    .filter(work_orders::Column::Status.eq(Status::Open.as_str()))
                    .exec(&conn)
                    .await
            })
        })
        .await?;

        Ok(result.rows_affected)
    }

    /// Empties the table, returning the prior row count.
    pub async fn delete_all(&self) -> Result<u64, StoreError> {
        let conn = self.conn.clone();

        let result = with_busy_retry(move || {
            let conn = conn.clone();
            Box::pin(async move { WorkOrders::delete_many().exec(&conn).await })
        })
        .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete_by_machine(&self, machine_id: &str) -> Result<u64, StoreError> {
        let conn = self.conn.clone();
        let machine_id = machine_id.to_string();

        let result = with_busy_retry(move || {
            let conn = conn.clone();
            let machine_id = machine_id.clone();
            Box::pin(async move {
                WorkOrders::delete_many()
                    .filter(work_orders::Column::MachineId.eq(machine_id))
                    .exec(&conn)
                    .await
            })
        })
        .await?;

        Ok(result.rows_affected)
    }

    /// Retention delete: removes closed orders whose `closed_at` parses as
    /// strictly older than `days` days ago. A `closed_at` that fails to
    /// parse keeps its row (fail closed - never delete on ambiguous data).
    /// Select and delete run in one transaction.
    pub async fn delete_closed_older_than(&self, days: u32) -> Result<u64, StoreError> {
        let conn = self.conn.clone();

        let result = with_busy_retry(move || {
            let conn = conn.clone();
            Box::pin(async move {
                let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
                let txn = conn.begin().await?;

                let closed = WorkOrders::find()
                    .filter(work_orders::Column::Status.eq(Status::Closed.as_str()))
                    .all(&txn)
                    .await?;

                let expired: Vec<i64> = closed
                    .into_iter()
                    .filter_map(|row| {
                        let closed_at = row.closed_at?;
                        match DateTime::parse_from_rfc3339(&closed_at) {
                            Ok(ts) if ts.with_timezone(&Utc) < cutoff => Some(row.id),
                            Ok(_) => None,
                            Err(err) => {
                                warn!(
                                    "work order {} has unparseable closed_at '{}': {}; keeping it",
                                    row.id, closed_at, err
                                );
                                None
                            }
                        }
                    })
                    .collect();

                if expired.is_empty() {
                    txn.commit().await?;
                    return Ok(sea_orm::DeleteResult { rows_affected: 0 });
                }

                let result = WorkOrders::delete_many()
                    .filter(work_orders::Column::Id.is_in(expired))
                    .exec(&txn)
                    .await?;
                txn.commit().await?;
                Ok(result)
            })
        })
        .await?;

        Ok(result.rows_affected)
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.clone();

        with_busy_retry(move || {
            let conn = conn.clone();
            Box::pin(async move { WorkOrders::find().count(&conn).await })
        })
        .await
    }
}
