use std::process::ExitCode;

use crate::clients::twilio::SmsClient;
use crate::config::Config;
use crate::db::Store;
use crate::models::NewWorkOrder;
use crate::models::Priority;
use crate::services::WorkOrderService;

pub async fn cmd_add(
    config: &Config,
    machine_id: &str,
    issue: &str,
    priority: Priority,
    assigned_to: Option<String>,
    notes: Option<String>,
) -> anyhow::Result<ExitCode> {
    let store = Store::new(&config.database_url()).await?;
    let service = WorkOrderService::new(store, SmsClient::from_config(&config.notify));

    let mut new = NewWorkOrder::new(machine_id, issue).priority(priority.as_str());
    new.assigned_to = assigned_to;
    new.notes = notes;

    let id = service.create(&new).await?;
    println!("Added work order #{id}");

    Ok(ExitCode::SUCCESS)
}
