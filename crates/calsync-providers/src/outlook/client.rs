//! Microsoft Graph calendar client.

use calsync_core::{CalendarType, TaskData};
use serde::Deserialize;
use tracing::debug;

use crate::auth::AccessToken;
use crate::error::{ProviderError, ProviderResult};
use crate::http::{ApiBase, send_json};
use crate::payload::{OutlookEventPayload, outlook_event};
use crate::provider::{BoxFuture, CalendarAdapter, SyncedEvent};

/// Base URL for Microsoft Graph v1.0.
pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

const PROVIDER: &str = "outlook";

/// Graph client bound to one bearer token.
///
/// Cheap to build; the router creates one per request from the caller's
/// token.
#[derive(Debug, Clone)]
pub struct OutlookCalendarClient {
    http_client: reqwest::Client,
    base: ApiBase,
    access_token: AccessToken,
}

impl OutlookCalendarClient {
    /// Creates a client for the given token.
    pub fn new(http_client: reqwest::Client, base: ApiBase, access_token: AccessToken) -> Self {
        Self {
            http_client,
            base,
            access_token,
        }
    }

    /// Posts an event to `/me/events`.
    ///
    /// Graph validates the body; an empty subject comes back as a 400.
    pub async fn post_event(&self, event: &OutlookEventPayload) -> ProviderResult<GraphEvent> {
        if self.access_token.is_blank() {
            return Err(
                ProviderError::authentication("missing access token").with_provider(PROVIDER)
            );
        }

        let url = self.base.join(&["me", "events"])?;
        debug!("posting Outlook calendar event");

        let request = self
            .http_client
            .post(url)
            .bearer_auth(self.access_token.as_str())
            .json(event);

        let raw: serde_json::Value = send_json(PROVIDER, request).await?;
        GraphEvent::from_raw(raw)
    }
}

impl CalendarAdapter for OutlookCalendarClient {
    fn calendar_type(&self) -> CalendarType {
        CalendarType::Outlook
    }

    fn create_event<'a>(
        &'a self,
        task: &'a TaskData,
    ) -> BoxFuture<'a, ProviderResult<SyncedEvent>> {
        Box::pin(async move {
            let event = self.post_event(&outlook_event(task)).await?;
            debug!(id = %event.id, "created Outlook calendar event");
            Ok(event.into_synced())
        })
    }
}

/// The parts of a Graph `event` this crate reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEvent {
    pub id: String,
    pub subject: Option<String>,
    pub web_link: Option<String>,
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl GraphEvent {
    fn from_raw(raw: serde_json::Value) -> ProviderResult<Self> {
        let mut event: GraphEvent = serde_json::from_value(raw.clone()).map_err(|e| {
            ProviderError::invalid_response("event response has no id")
                .with_source(e)
                .with_provider(PROVIDER)
        })?;
        event.raw = raw;
        Ok(event)
    }

    fn into_synced(self) -> SyncedEvent {
        SyncedEvent::new(CalendarType::Outlook, self.id)
            .with_title(self.subject)
            .with_web_link(self.web_link)
            .with_raw(self.raw)
    }
}
