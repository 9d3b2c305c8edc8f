use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Additive columns for databases created before assignment tracking
/// existed. Guarded by `has_column` so pointing the store at any older
/// database file is safe, repeatedly.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_column("work_orders", "assigned_to").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(WorkOrders::Table)
                        .add_column(ColumnDef::new(WorkOrders::AssignedTo).string().null())
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_column("work_orders", "notes").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(WorkOrders::Table)
                        .add_column(ColumnDef::new(WorkOrders::Notes).string().null())
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_column("work_orders", "updated_at").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(WorkOrders::Table)
                        .add_column(ColumnDef::new(WorkOrders::UpdatedAt).string().null())
                        .to_owned(),
                )
                .await?;
        }

        // Backfill: a closed row was last touched when it closed, an open
        // row when it was created.
        manager
            .get_connection()
            .execute_unprepared(
                "UPDATE work_orders \
                 SET updated_at = COALESCE(closed_at, created_at) \
                 WHERE updated_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            WorkOrders::UpdatedAt,
            WorkOrders::Notes,
            WorkOrders::AssignedTo,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(WorkOrders::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum WorkOrders {
    Table,
    AssignedTo,
    Notes,
    UpdatedAt,
}
