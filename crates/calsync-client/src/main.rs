//! calsync CLI entry point.

use std::process::ExitCode;

use calsync_core::{TracingConfig, init_tracing};
use clap::Parser;

use calsync_client::cli::{Cli, Command, ConfigAction, TaskAction};
use calsync_client::commands::{self, Report};
use calsync_client::config::ClientConfig;
use calsync_client::error::ClientResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.json_logs {
        let batch = TracingConfig::batch();
        if cli.debug {
            batch.with_level(tracing::Level::DEBUG)
        } else {
            batch
        }
    } else {
        TracingConfig::cli(cli.debug)
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(Some(report)) => {
            match serde_json::to_string_pretty(&report.body) {
                Ok(out) => println!("{}", out),
                Err(e) => {
                    eprintln!("error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            if report.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.chain());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<Option<Report>> {
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };

    let report = match cli.command {
        Command::Sync(args) => commands::sync::sync(&config, args).await?,
        Command::SyncDatabase(args) => commands::sync::sync_database_command(&config, args).await?,
        Command::Tasks { action } => match action {
            TaskAction::List {
                database_id,
                all,
                mapped,
            } => commands::tasks::list(&config, database_id, all, mapped).await?,
            TaskAction::Create(args) => commands::tasks::create(&config, args).await?,
            TaskAction::Update {
                page_id,
                properties,
            } => commands::tasks::update(&config, &page_id, &properties).await?,
            TaskAction::Delete { page_id } => commands::tasks::delete(&config, &page_id).await?,
        },
        Command::Config { action } => {
            match action {
                ConfigAction::Dump => commands::config::dump(&config)?,
                ConfigAction::Validate => commands::config::validate(&config)?,
                ConfigAction::Path => commands::config::path()?,
            }
            return Ok(None);
        }
    };
    Ok(Some(report))
}
