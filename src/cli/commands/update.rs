use std::process::ExitCode;

use crate::config::Config;
use crate::db::Store;
use crate::models::{Priority, WorkOrderPatch};

pub async fn cmd_update(
    config: &Config,
    id: i64,
    issue: Option<String>,
    priority: Option<Priority>,
    assigned_to: Option<String>,
    notes: Option<String>,
) -> anyhow::Result<ExitCode> {
    let patch = WorkOrderPatch {
        issue,
        priority,
        assigned_to,
        notes,
    };

    if patch.is_empty() {
        println!("No fields supplied; nothing to update.");
        return Ok(ExitCode::from(1));
    }

    let store = Store::new(&config.database_url()).await?;
    let updated = store.update_work_order(id, &patch).await?;

    if updated == 0 {
        println!("No work order with id {id}");
        return Ok(ExitCode::from(1));
    }

    println!("Updated work order #{id}");
    Ok(ExitCode::SUCCESS)
}
