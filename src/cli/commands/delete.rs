use std::process::ExitCode;

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_delete_all(config: &Config) -> anyhow::Result<ExitCode> {
    let store = Store::new(&config.database_url()).await?;
    let deleted = store.delete_all_work_orders().await?;
    println!("Deleted {deleted} work order(s)");
    Ok(ExitCode::SUCCESS)
}

pub async fn cmd_delete_machine(config: &Config, machine_id: &str) -> anyhow::Result<ExitCode> {
    let store = Store::new(&config.database_url()).await?;
    let deleted = store.delete_work_orders_by_machine(machine_id).await?;
    println!("Deleted {deleted} work order(s) for machine {machine_id}");
    Ok(ExitCode::SUCCESS)
}

pub async fn cmd_delete_closed_older_than(
    config: &Config,
    days: u32,
) -> anyhow::Result<ExitCode> {
    let store = Store::new(&config.database_url()).await?;
    let deleted = store.delete_closed_older_than(days).await?;
    println!("Deleted {deleted} closed work order(s) older than {days} day(s)");
    Ok(ExitCode::SUCCESS)
}
