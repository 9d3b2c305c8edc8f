use std::process::ExitCode;

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_show(config: &Config, id: i64) -> anyhow::Result<ExitCode> {
    let store = Store::new(&config.database_url()).await?;

    let Some(order) = store.get_work_order_by_id(id).await? else {
        println!("(no work order found with id {id})");
        return Ok(ExitCode::from(1));
    };

    println!("Work Order #{}", order.id);
    println!("Machine ID : {}", order.machine_id);
    println!("Priority   : {}", order.priority);
    println!("Status     : {}", order.status);
    println!("Created At : {}", order.created_at);
    println!("Closed At  : {}", order.closed_at.as_deref().unwrap_or("-"));
    println!("Updated At : {}", order.updated_at);
    println!("Assigned To: {}", order.assigned_to.as_deref().unwrap_or("-"));
    println!("Notes      : {}", order.notes.as_deref().unwrap_or("-"));
    println!("Issue      : {}", order.issue);

    Ok(ExitCode::SUCCESS)
}
