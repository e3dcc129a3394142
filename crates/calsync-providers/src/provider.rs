//! CalendarAdapter trait definition.
//!
//! A [`CalendarAdapter`] turns one [`TaskData`] into one event on a remote
//! calendar. Google and Outlook each implement it; the router picks one per
//! request.

use std::future::Future;
use std::pin::Pin;

use calsync_core::{CalendarType, TaskData};
use serde::Serialize;

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Keeps [`CalendarAdapter`] object-safe so the router can hold
/// `&dyn CalendarAdapter`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An event created on a calendar provider, in one shape for every provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncedEvent {
    /// Which provider holds the event.
    pub provider: CalendarType,
    /// Provider-assigned event identifier.
    pub id: String,
    /// The title as echoed back (`summary` or `subject`).
    pub title: Option<String>,
    /// Link to open the event in the provider's UI.
    pub web_link: Option<String>,
    /// The provider's full response body.
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl SyncedEvent {
    /// Creates an event with only an identifier.
    pub fn new(provider: CalendarType, id: impl Into<String>) -> Self {
        Self {
            provider,
            id: id.into(),
            title: None,
            web_link: None,
            raw: serde_json::Value::Null,
        }
    }

    /// Builder method to set the echoed title.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Builder method to set the web link.
    pub fn with_web_link(mut self, link: Option<String>) -> Self {
        self.web_link = link;
        self
    }

    /// Builder method to attach the raw response.
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }
}

/// A calendar backend that can create an event from a task.
///
/// Implementations issue exactly one request per call and keep no state
/// between calls.
pub trait CalendarAdapter: Send + Sync {
    /// The provider this adapter talks to.
    fn calendar_type(&self) -> CalendarType;

    /// Builds the provider payload for `task` and creates the event.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` for missing auth, transport failures, non-2xx
    /// responses, and undecodable bodies.
    fn create_event<'a>(&'a self, task: &'a TaskData)
    -> BoxFuture<'a, ProviderResult<SyncedEvent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synced_event_builder() {
        let event = SyncedEvent::new(CalendarType::Google, "evt-1")
            .with_title(Some("Standup".to_string()))
            .with_web_link(Some("https://calendar.google.com/event?eid=1".to_string()))
            .with_raw(serde_json::json!({"id": "evt-1"}));

        assert_eq!(event.id, "evt-1");
        assert_eq!(event.provider, CalendarType::Google);
        assert_eq!(event.title.as_deref(), Some("Standup"));
        assert_eq!(event.raw["id"], "evt-1");
    }

    #[test]
    fn raw_is_not_serialized() {
        let event = SyncedEvent::new(CalendarType::Outlook, "AAMk")
            .with_raw(serde_json::json!({"id": "AAMk", "huge": [1, 2, 3]}));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["provider"], "Outlook");
        assert!(value.get("raw").is_none());
    }
}
