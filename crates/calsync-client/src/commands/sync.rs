//! Calendar sync commands.

use calsync_core::{CalendarType, TaskData};
use calsync_providers::database_sync::{DatabaseSync, sync_database};
use calsync_providers::{AccessToken, SyncError, sync_report};
use serde_json::json;
use tracing::info;

use super::Report;
use crate::cli::{SyncArgs, SyncDatabaseArgs};
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Creates one event on the calendar named by `--calendar`.
///
/// A failed sync is not an `Err`: it reports `{"error": ...}` and a
/// failing exit status.
pub async fn sync(config: &ClientConfig, args: SyncArgs) -> ClientResult<Report> {
    let router = config.router()?;
    let auth = token_for(config, &args.calendar, args.token)?;
    let task =
        TaskData::new(args.title, args.start, args.end).with_description(args.description);

    let result = router.sync_with_calendar(&task, &args.calendar, &auth).await;
    let body = sync_report(&result);
    Ok(if result.is_ok() {
        Report::ok(body)
    } else {
        Report::failed(body)
    })
}

/// Creates an event for every page of the database.
///
/// Exits unsuccessfully if any page failed.
pub async fn sync_database_command(
    config: &ClientConfig,
    args: SyncDatabaseArgs,
) -> ClientResult<Report> {
    let calendar_type = match args.calendar.parse::<CalendarType>() {
        Ok(kind) => kind,
        Err(unsupported) => {
            let err = SyncError::UnsupportedCalendar {
                tag: unsupported.tag,
            };
            return Ok(Report::failed(err.to_json()));
        }
    };
    let database_id = config.database_id(args.database_id)?;
    let notion = config.notion_client()?;
    let router = config.router()?;
    let auth = match args.token {
        Some(token) => AccessToken::new(token),
        None => config.calendar_token(calendar_type)?,
    };

    let outcomes = sync_database(
        &notion,
        &router,
        DatabaseSync {
            database_id: &database_id,
            calendar_type,
            auth: &auth,
            properties: &config.properties,
        },
    )
    .await?;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(database_id = %database_id, total = outcomes.len(), failed, "database pass done");
    let body = json!({
        "database_id": database_id,
        "calendar": calendar_type,
        "synced": outcomes.len() - failed,
        "failed": failed,
        "pages": outcomes.iter().map(|o| o.to_json()).collect::<Vec<_>>(),
    });
    Ok(if failed == 0 {
        Report::ok(body)
    } else {
        Report::failed(body)
    })
}

/// `--token` wins; otherwise the configured token for a known tag. Unknown
/// tags get a blank token since the router rejects them before any call.
fn token_for(
    config: &ClientConfig,
    calendar: &str,
    explicit: Option<String>,
) -> ClientResult<AccessToken> {
    if let Some(token) = explicit {
        return Ok(AccessToken::new(token));
    }
    match calendar.parse::<CalendarType>() {
        Ok(kind) => config.calendar_token(kind),
        Err(_) => Ok(AccessToken::default()),
    }
}
