use std::process::ExitCode;

use crate::config::Config;
use crate::db::Store;
use crate::models::Status;
use crate::services::export::work_orders_to_csv;

pub async fn cmd_export(
    config: &Config,
    status: Option<Status>,
    machine_id: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let store = Store::new(&config.database_url()).await?;

    let rows = match machine_id {
        Some(machine_id) => store.list_work_orders_by_machine(machine_id, status).await?,
        None => store.list_work_orders(status).await?,
    };

    print!("{}", work_orders_to_csv(&rows));
    Ok(ExitCode::SUCCESS)
}
