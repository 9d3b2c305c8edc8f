pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;

use std::process::ExitCode;

use clap::Parser;

use cli::commands;
use cli::{Cli, Commands, DeleteCommands};
pub use config::Config;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(db) = cli.db {
        config.general.database_path = db;
    }

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    match cli.command {
        Commands::Add {
            machine_id,
            issue,
            priority,
            assigned_to,
            notes,
        } => commands::cmd_add(&config, &machine_id, &issue, priority, assigned_to, notes).await,
        Commands::List { status } => commands::cmd_list(&config, status).await,
        Commands::History { machine_id, status } => {
            commands::cmd_history(&config, &machine_id, status).await
        }
        Commands::Show { id } => commands::cmd_show(&config, id).await,
        Commands::Close { id } => commands::cmd_close(&config, id).await,
        Commands::Update {
            id,
            issue,
            priority,
            assigned_to,
            notes,
        } => commands::cmd_update(&config, id, issue, priority, assigned_to, notes).await,
        Commands::Delete { command } => match command {
            DeleteCommands::All => commands::cmd_delete_all(&config).await,
            DeleteCommands::Machine { machine_id } => {
                commands::cmd_delete_machine(&config, &machine_id).await
            }
            DeleteCommands::ClosedOlderThan { days } => {
                commands::cmd_delete_closed_older_than(&config, days).await
            }
        },
        Commands::Export { status, machine_id } => {
            commands::cmd_export(&config, status, machine_id.as_deref()).await
        }
        Commands::Login { username, password } => {
            commands::cmd_login(&config, &username, &password).await
        }
    }
}
