//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// calsync - Push Notion tasks to Google Calendar or Outlook
#[derive(Debug, Parser)]
#[command(name = "calsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALSYNC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Write logs as JSON lines (for scheduled runs)
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create one calendar event
    Sync(SyncArgs),

    /// Create an event for every page of a Notion database
    SyncDatabase(SyncDatabaseArgs),

    /// Notion task commands
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `calsync sync`.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Target calendar: "Google" or "Outlook"
    #[arg(long)]
    pub calendar: String,

    /// Event title
    #[arg(long)]
    pub title: String,

    /// Event description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Start timestamp (ISO-8601)
    #[arg(long)]
    pub start: String,

    /// End timestamp (ISO-8601)
    #[arg(long)]
    pub end: String,

    /// Calendar access token; overrides the config file
    #[arg(long, env = "CALSYNC_CALENDAR_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Arguments for `calsync sync-database`.
#[derive(Debug, Args)]
pub struct SyncDatabaseArgs {
    /// Target calendar: "Google" or "Outlook"
    #[arg(long)]
    pub calendar: String,

    /// Notion database ID; defaults to notion.database_id
    #[arg(long)]
    pub database_id: Option<String>,

    /// Calendar access token; overrides the config file
    #[arg(long, env = "CALSYNC_CALENDAR_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Notion task actions.
#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// List pages of a database
    List {
        /// Notion database ID; defaults to notion.database_id
        #[arg(long)]
        database_id: Option<String>,

        /// Follow pagination and return every page
        #[arg(long)]
        all: bool,

        /// Show pages as mapped tasks instead of raw Notion objects
        #[arg(long)]
        mapped: bool,
    },

    /// Create a page
    Create(CreateTaskArgs),

    /// Replace properties on a page
    Update {
        /// Page ID
        page_id: String,

        /// Properties object as JSON
        #[arg(long)]
        properties: String,
    },

    /// Archive a page
    Delete {
        /// Page ID
        page_id: String,
    },
}

/// Arguments for `calsync tasks create`.
///
/// Either `--properties` or the `--title`/`--start`/`--end` trio.
#[derive(Debug, Args)]
pub struct CreateTaskArgs {
    /// Notion database ID; defaults to notion.database_id
    #[arg(long)]
    pub database_id: Option<String>,

    /// Properties object as JSON
    #[arg(long, conflicts_with_all = ["title", "description", "start", "end"])]
    pub properties: Option<String>,

    /// Task title
    #[arg(long, required_unless_present = "properties")]
    pub title: Option<String>,

    /// Task description
    #[arg(long)]
    pub description: Option<String>,

    /// Start date or timestamp
    #[arg(long, required_unless_present = "properties")]
    pub start: Option<String>,

    /// End date or timestamp
    #[arg(long, required_unless_present = "properties")]
    pub end: Option<String>,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
