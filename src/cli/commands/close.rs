use std::process::ExitCode;

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_close(config: &Config, id: i64) -> anyhow::Result<ExitCode> {
    let store = Store::new(&config.database_url()).await?;

    let updated = store.close_work_order(id).await?;
    if updated == 0 {
        println!("No open work order with id {id} (maybe already closed?)");
        return Ok(ExitCode::from(1));
    }

    println!("Closed work order #{id}");
    Ok(ExitCode::SUCCESS)
}
