//! Notion task commands.

use calsync_core::TaskData;
use calsync_providers::NotionPage;
use calsync_providers::notion::{properties_from_task, task_from_page};
use serde_json::{Value, json};

use super::{Report, parse_properties};
use crate::cli::CreateTaskArgs;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Lists pages of a database, optionally as mapped tasks.
pub async fn list(
    config: &ClientConfig,
    database_id: Option<String>,
    all: bool,
    mapped: bool,
) -> ClientResult<Report> {
    let database_id = config.database_id(database_id)?;
    let notion = config.notion_client()?;
    let pages = if all {
        notion.fetch_all_tasks(&database_id).await?
    } else {
        notion.fetch_tasks(&database_id).await?
    };

    let body: Vec<Value> = if mapped {
        pages.iter().map(|page| mapped_page(page, config)).collect()
    } else {
        pages.into_iter().map(|page| page.raw).collect()
    };
    Ok(Report::ok(Value::Array(body)))
}

fn mapped_page(page: &NotionPage, config: &ClientConfig) -> Value {
    match task_from_page(page, &config.properties) {
        Ok(task) => json!({ "id": page.id, "task": task }),
        Err(err) => json!({ "id": page.id, "error": err.to_string() }),
    }
}

/// Creates a page from raw properties or from task fields.
pub async fn create(config: &ClientConfig, args: CreateTaskArgs) -> ClientResult<Report> {
    let database_id = config.database_id(args.database_id)?;
    let properties = match args.properties {
        Some(raw) => parse_properties(&raw)?,
        None => {
            let (Some(title), Some(start), Some(end)) = (args.title, args.start, args.end) else {
                return Err(ClientError::Usage(
                    "--title, --start and --end are required without --properties".to_string(),
                ));
            };
            let task = TaskData::new(title, start, end)
                .with_description(args.description.unwrap_or_default());
            properties_from_task(&task, &config.properties)
        }
    };

    let notion = config.notion_client()?;
    let page = notion.create_task(&database_id, &properties).await?;
    Ok(Report::ok(page.raw))
}

/// Replaces properties on a page.
pub async fn update(
    config: &ClientConfig,
    page_id: &str,
    properties: &str,
) -> ClientResult<Report> {
    let properties = parse_properties(properties)?;
    let page = config
        .notion_client()?
        .update_task(page_id, &properties)
        .await?;
    Ok(Report::ok(page.raw))
}

/// Archives a page.
pub async fn delete(config: &ClientConfig, page_id: &str) -> ClientResult<Report> {
    let page = config.notion_client()?.delete_task(page_id).await?;
    Ok(Report::ok(page.raw))
}
