use sea_orm_migration::prelude::*;

mod m20240101_create_work_orders;
mod m20240622_add_users;
mod m20250114_add_work_order_details;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_create_work_orders::Migration),
            Box::new(m20240622_add_users::Migration),
            Box::new(m20250114_add_work_order_details::Migration),
        ]
    }
}
