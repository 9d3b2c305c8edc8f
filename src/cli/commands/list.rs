use std::process::ExitCode;

use super::clip;
use crate::config::Config;
use crate::db::Store;
use crate::models::Status;

pub async fn cmd_list(config: &Config, status: Option<Status>) -> anyhow::Result<ExitCode> {
    let store = Store::new(&config.database_url()).await?;
    let rows = store.list_work_orders(status).await?;

    if rows.is_empty() {
        println!("(no work orders found)");
        return Ok(ExitCode::SUCCESS);
    }

    println!("{:>4}  {:<10}  {:<4}  {:<6}  ISSUE", "ID", "MACHINE", "PRIO", "STATUS");
    println!("{:-<70}", "");

    for r in rows {
        println!(
            "{:>4}  {:<10}  {:<4}  {:<6}  {}",
            r.id,
            r.machine_id,
            r.priority.as_str(),
            r.status.as_str(),
            clip(&r.issue, 45)
        );
    }

    Ok(ExitCode::SUCCESS)
}
