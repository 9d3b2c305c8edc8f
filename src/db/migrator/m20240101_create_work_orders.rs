use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The priority/status CHECK constraints live here rather than in
        // application code: the database is the authority on the enums.
        manager
            .create_table(
                Table::create()
                    .table(WorkOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkOrders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkOrders::MachineId).string().not_null())
                    .col(ColumnDef::new(WorkOrders::Issue).string().not_null())
                    .col(
                        ColumnDef::new(WorkOrders::Priority)
                            .string()
                            .not_null()
                            .check(Expr::col(WorkOrders::Priority).is_in(["low", "med", "high"])),
                    )
                    .col(
                        ColumnDef::new(WorkOrders::Status)
                            .string()
                            .not_null()
                            .check(Expr::col(WorkOrders::Status).is_in(["open", "closed"])),
                    )
                    .col(ColumnDef::new(WorkOrders::CreatedAt).string().not_null())
                    .col(ColumnDef::new(WorkOrders::ClosedAt).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WorkOrders {
    Table,
    Id,
    MachineId,
    Issue,
    Priority,
    Status,
    CreatedAt,
    ClosedAt,
}
