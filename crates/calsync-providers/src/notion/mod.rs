//! Notion database access.
//!
//! - [`NotionClient`] - query, create, update and archive pages
//! - [`NotionPage`] - a page with its properties
//! - [`task_from_page`] / [`properties_from_task`] - convert between pages
//!   and [`TaskData`](calsync_core::TaskData)

mod client;
mod mapping;
mod page;

pub use client::{NOTION_API_BASE, NOTION_VERSION, NotionClient};
pub use mapping::{MappingError, PropertyMap, properties_from_task, task_from_page};
pub use page::NotionPage;
