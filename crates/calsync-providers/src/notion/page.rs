//! Notion page and query response types.

use serde::Deserialize;
use tracing::warn;

use crate::error::{ProviderError, ProviderResult};

/// A Notion page as returned by the pages and query endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotionPage {
    pub id: String,
    /// Set once the page has been soft-deleted.
    #[serde(default)]
    pub archived: bool,
    pub url: Option<String>,
    /// Property name to property value, as Notion sends it.
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    /// The full page object.
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl NotionPage {
    pub(crate) fn from_raw(raw: serde_json::Value) -> ProviderResult<Self> {
        let mut page: NotionPage = serde_json::from_value(raw.clone()).map_err(|e| {
            ProviderError::invalid_response("page object has no id")
                .with_source(e)
                .with_provider("notion")
        })?;
        page.raw = raw;
        Ok(page)
    }

    /// Like [`from_raw`](Self::from_raw) but never fails: an entry that is not
    /// a page object comes back with an empty `id` and its JSON in `raw`.
    pub(crate) fn from_result(raw: serde_json::Value) -> Self {
        match Self::from_raw(raw.clone()) {
            Ok(page) => page,
            Err(err) => {
                warn!(error = %err, "keeping unparseable query result as raw JSON");
                Self {
                    id: String::new(),
                    archived: false,
                    url: None,
                    properties: serde_json::Map::new(),
                    raw,
                }
            }
        }
    }

    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name)
    }
}

/// One page of a database query.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}
