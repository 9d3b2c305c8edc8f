use std::process::ExitCode;

use super::clip;
use crate::config::Config;
use crate::db::Store;
use crate::models::Status;

pub async fn cmd_history(
    config: &Config,
    machine_id: &str,
    status: Option<Status>,
) -> anyhow::Result<ExitCode> {
    let store = Store::new(&config.database_url()).await?;
    let rows = store.list_work_orders_by_machine(machine_id, status).await?;

    if rows.is_empty() {
        let status_note = status.map_or(String::new(), |s| format!(" with status={s}"));
        println!("(no work orders found for machine {machine_id}{status_note})");
        return Ok(ExitCode::SUCCESS);
    }

    println!("History for machine: {machine_id}");
    println!(
        "{:>4}  {:<4}  {:<6}  {:<20}  ISSUE",
        "ID", "PRIO", "STATUS", "CREATED"
    );
    println!("{:-<80}", "");

    for r in rows {
        println!(
            "{:>4}  {:<4}  {:<6}  {:<20}  {}",
            r.id,
            r.priority.as_str(),
            r.status.as_str(),
            r.created_at,
            clip(&r.issue, 40)
        );
    }

    Ok(ExitCode::SUCCESS)
}
