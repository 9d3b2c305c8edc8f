use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "work_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub machine_id: String,

    pub issue: String,

    /// One of `low`, `med`, `high`; enforced by a CHECK constraint.
    pub priority: String,

    /// One of `open`, `closed`; enforced by a CHECK constraint.
    pub status: String,

    /// UTC, second precision, ISO-8601 with `Z` suffix. Immutable.
    pub created_at: String,

    /// Set exactly once, when the order transitions to `closed`.
    pub closed_at: Option<String>,

    /// Nullable at the schema level: rows created before the column existed
    /// are backfilled by migration, but the column itself stays optional.
    pub updated_at: Option<String>,

    pub assigned_to: Option<String>,

    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
