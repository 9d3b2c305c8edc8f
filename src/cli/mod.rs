//! Command-line interface for the work-order tracker.
//!
//! Thin wrappers: argument parsing here, one handler per subcommand under
//! `commands/`, all real behavior in the store and service layers.

pub mod commands;

use clap::{Parser, Subcommand};

use crate::models::{Priority, Status};

/// Work-order tracker for maintenance teams
#[derive(Parser)]
#[command(name = "workorders")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the SQLite database file (default: ./workorders.db)
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new work order
    Add {
        /// Machine identifier (e.g., KMT-102)
        #[arg(long)]
        machine_id: String,

        /// Issue description
        #[arg(long)]
        issue: String,

        /// Priority level
        #[arg(long, value_enum, default_value_t = Priority::Med)]
        priority: Priority,

        /// Person the order is assigned to
        #[arg(long)]
        assigned_to: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List work orders
    #[command(alias = "ls")]
    List {
        /// Filter by status
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// Show work order history for a machine
    History {
        /// Machine identifier (e.g., KMT-102)
        #[arg(long)]
        machine_id: String,

        /// Optional status filter
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// Show a work order by id
    Show {
        /// Work order id
        #[arg(long)]
        id: i64,
    },

    /// Close a work order by id
    Close {
        /// Work order id
        #[arg(long)]
        id: i64,
    },

    /// Update fields of an existing work order
    Update {
        /// Work order id
        #[arg(long)]
        id: i64,

        /// New issue description
        #[arg(long)]
        issue: Option<String>,

        /// New priority level
        #[arg(long, value_enum)]
        priority: Option<Priority>,

        /// New assignee
        #[arg(long)]
        assigned_to: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete work orders
    Delete {
        #[command(subcommand)]
        command: DeleteCommands,
    },

    /// Export the filtered listing as CSV on stdout
    Export {
        /// Filter by status
        #[arg(long, value_enum)]
        status: Option<Status>,

        /// Restrict to one machine
        #[arg(long)]
        machine_id: Option<String>,
    },

    /// Verify a username/password pair against the credential store
    Login {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum DeleteCommands {
    /// Delete every work order
    All,

    /// Delete all work orders for one machine
    Machine {
        /// Machine identifier
        machine_id: String,
    },

    /// Delete closed work orders past the retention window
    ClosedOlderThan {
        /// Retention window in days
        #[arg(long)]
        days: u32,
    },
}
