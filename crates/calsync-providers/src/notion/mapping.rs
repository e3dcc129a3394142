//! Conversion between Notion page properties and [`TaskData`].
//!
//! A database is expected to carry a title property, an optional rich-text
//! description, and date properties for start and end. Their names are
//! configurable through [`PropertyMap`].

use calsync_core::{TaskData, TimeError, normalize_timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use super::page::NotionPage;

/// Errors from reading a task out of a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("page {page_id} has no '{property}' property")]
    MissingProperty { page_id: String, property: String },

    #[error("property '{property}' on page {page_id} has no date")]
    MissingDate { page_id: String, property: String },

    #[error("property '{property}' on page {page_id}: {source}")]
    InvalidDate {
        page_id: String,
        property: String,
        #[source]
        source: TimeError,
    },
}

/// Names of the database properties that hold each task field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyMap {
    pub title: String,
    pub description: String,
    pub start: String,
    /// May equal `start` when the database uses one date range property.
    pub end: String,
}

impl Default for PropertyMap {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            description: "Description".to_string(),
            start: "StartDate".to_string(),
            end: "EndDate".to_string(),
        }
    }
}

/// Reads a task from a page.
///
/// The end falls back to the start property's range end, then to the start
/// itself. Dates are normalized to UTC RFC3339.
pub fn task_from_page(page: &NotionPage, map: &PropertyMap) -> Result<TaskData, MappingError> {
    let title_prop = page
        .property(&map.title)
        .ok_or_else(|| missing(page, &map.title))?;
    let title = plain_text(title_prop.get("title"));

    let description = page
        .property(&map.description)
        .map(|p| plain_text(p.get("rich_text")))
        .unwrap_or_default();

    let start_prop = page
        .property(&map.start)
        .ok_or_else(|| missing(page, &map.start))?;
    let start = date_field(start_prop, "start").ok_or_else(|| MappingError::MissingDate {
        page_id: page.id.clone(),
        property: map.start.clone(),
    })?;

    let (end, end_property) = if map.end != map.start
        && let Some(end) = page.property(&map.end).and_then(|p| date_field(p, "start"))
    {
        (end, &map.end)
    } else if let Some(end) = date_field(start_prop, "end") {
        (end, &map.start)
    } else {
        (start, &map.start)
    };

    Ok(TaskData {
        title,
        description,
        start_date_time: normalize(page, &map.start, start)?,
        end_date_time: normalize(page, end_property, end)?,
    })
}

/// Builds the Notion `properties` object for a task.
pub fn properties_from_task(task: &TaskData, map: &PropertyMap) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        map.title.clone(),
        json!({ "title": [text_block(&task.title)] }),
    );
    if !task.description.is_empty() {
        properties.insert(
            map.description.clone(),
            json!({ "rich_text": [text_block(&task.description)] }),
        );
    }
    if map.start == map.end {
        properties.insert(
            map.start.clone(),
            json!({ "date": { "start": task.start_date_time, "end": task.end_date_time } }),
        );
    } else {
        properties.insert(
            map.start.clone(),
            json!({ "date": { "start": task.start_date_time } }),
        );
        properties.insert(
            map.end.clone(),
            json!({ "date": { "start": task.end_date_time } }),
        );
    }
    Value::Object(properties)
}

fn text_block(content: &str) -> Value {
    json!({ "text": { "content": content } })
}

fn missing(page: &NotionPage, property: &str) -> MappingError {
    MappingError::MissingProperty {
        page_id: page.id.clone(),
        property: property.to_string(),
    }
}

fn date_field<'a>(property: &'a Value, field: &str) -> Option<&'a str> {
    property
        .get("date")
        .and_then(|d| d.get(field))
        .and_then(Value::as_str)
}

/// Concatenates a rich-text array. Response objects carry `plain_text`;
/// request-shaped objects only have `text.content`.
fn plain_text(blocks: Option<&Value>) -> String {
    blocks
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|b| {
                    b.get("plain_text")
                        .and_then(Value::as_str)
                        .or_else(|| b.pointer("/text/content").and_then(Value::as_str))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn normalize(page: &NotionPage, property: &str, value: &str) -> Result<String, MappingError> {
    normalize_timestamp(value).map_err(|source| MappingError::InvalidDate {
        page_id: page.id.clone(),
        property: property.to_string(),
        source,
    })
}
