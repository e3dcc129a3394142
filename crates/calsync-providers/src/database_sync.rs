//! One-shot sync of a whole Notion database to a calendar.
//!
//! Pages are fetched, mapped to tasks and dispatched one after another. A
//! page that fails to map or sync gets its own error; the pass continues.

use calsync_core::CalendarType;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::AccessToken;
use crate::error::ProviderResult;
use crate::notion::{MappingError, NotionClient, PropertyMap, task_from_page};
use crate::provider::SyncedEvent;
use crate::sync::{CalendarRouter, SyncError};

/// Why a single page was not synced.
#[derive(Debug, Error)]
pub enum PageSyncError {
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Result for one database page.
#[derive(Debug)]
pub struct PageSyncOutcome {
    pub page_id: String,
    pub result: Result<SyncedEvent, PageSyncError>,
}

impl PageSyncOutcome {
    /// Renders the outcome for reports.
    pub fn to_json(&self) -> serde_json::Value {
        match &self.result {
            Ok(event) => json!({
                "page_id": self.page_id,
                "event_id": event.id,
                "web_link": event.web_link,
            }),
            Err(err) => json!({
                "page_id": self.page_id,
                "error": err.to_string(),
            }),
        }
    }
}

/// Options for a database pass.
#[derive(Debug, Clone)]
pub struct DatabaseSync<'a> {
    pub database_id: &'a str,
    pub calendar_type: CalendarType,
    pub auth: &'a AccessToken,
    pub properties: &'a PropertyMap,
}

/// Fetches every page in the database and creates one event per page.
///
/// # Errors
///
/// Only a failed database query aborts the pass.
pub async fn sync_database(
    notion: &NotionClient,
    router: &CalendarRouter,
    options: DatabaseSync<'_>,
) -> ProviderResult<Vec<PageSyncOutcome>> {
    let pages = notion.fetch_all_tasks(options.database_id).await?;
    info!(
        database_id = options.database_id,
        pages = pages.len(),
        provider = options.calendar_type.provider_name(),
        "syncing database"
    );

    let mut outcomes = Vec::with_capacity(pages.len());
    for page in &pages {
        let result = match task_from_page(page, options.properties) {
            Ok(task) => router
                .sync_with(&task, options.calendar_type, options.auth)
                .await
                .map_err(PageSyncError::from),
            Err(err) => {
                warn!(page_id = %page.id, error = %err, "skipping page");
                Err(PageSyncError::from(err))
            }
        };
        outcomes.push(PageSyncOutcome {
            page_id: page.id.clone(),
            result,
        });
    }

    let synced = outcomes.iter().filter(|o| o.result.is_ok()).count();
    info!(
        synced,
        failed = outcomes.len() - synced,
        "database sync finished"
    );
    Ok(outcomes)
}
