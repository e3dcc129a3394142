//! Google Calendar API client.
//!
//! Inserts events through `POST /calendars/{calendarId}/events` with a
//! caller-supplied OAuth access token.

use calsync_core::{CalendarType, TaskData};
use serde::Deserialize;
use tracing::debug;

use crate::auth::AccessToken;
use crate::error::{ProviderError, ProviderResult};
use crate::http::{ApiBase, send_json};
use crate::payload::{GoogleEventPayload, google_event};
use crate::provider::{BoxFuture, CalendarAdapter, SyncedEvent};

/// Base URL for Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// The calendar events go to unless configured otherwise.
pub const PRIMARY_CALENDAR: &str = "primary";

const PROVIDER: &str = "google";

/// Google Calendar API client bound to one access token.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    base: ApiBase,
    access_token: AccessToken,
    calendar_id: String,
}

impl GoogleCalendarClient {
    /// Creates a client that writes to the `primary` calendar.
    pub fn new(http_client: reqwest::Client, base: ApiBase, access_token: AccessToken) -> Self {
        Self {
            http_client,
            base,
            access_token,
            calendar_id: PRIMARY_CALENDAR.to_string(),
        }
    }

    /// Builder method to target another calendar.
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Returns the target calendar ID.
    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// Inserts an event into the target calendar.
    ///
    /// A blank token is rejected before any request is made.
    pub async fn insert_event(&self, event: &GoogleEventPayload) -> ProviderResult<ApiEvent> {
        if self.access_token.is_blank() {
            return Err(
                ProviderError::authentication("missing access token").with_provider(PROVIDER)
            );
        }

        let url = self.base.join(&["calendars", &self.calendar_id, "events"])?;
        debug!(calendar = %self.calendar_id, "inserting Google Calendar event");

        let request = self
            .http_client
            .post(url)
            .bearer_auth(self.access_token.as_str())
            .json(event);

        let raw: serde_json::Value = send_json(PROVIDER, request).await?;
        ApiEvent::from_raw(raw)
    }
}

impl CalendarAdapter for GoogleCalendarClient {
    fn calendar_type(&self) -> CalendarType {
        CalendarType::Google
    }

    fn create_event<'a>(
        &'a self,
        task: &'a TaskData,
    ) -> BoxFuture<'a, ProviderResult<SyncedEvent>> {
        Box::pin(async move {
            let event = self.insert_event(&google_event(task)).await?;
            debug!(id = %event.id, "created Google Calendar event");
            Ok(event.into_synced())
        })
    }
}

/// The parts of a Google `Event` resource this crate reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    pub html_link: Option<String>,
    pub status: Option<String>,
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl ApiEvent {
    fn from_raw(raw: serde_json::Value) -> ProviderResult<Self> {
        let mut event: ApiEvent = serde_json::from_value(raw.clone()).map_err(|e| {
            ProviderError::invalid_response("event response has no id")
                .with_source(e)
                .with_provider(PROVIDER)
        })?;
        event.raw = raw;
        Ok(event)
    }

    fn into_synced(self) -> SyncedEvent {
        SyncedEvent::new(CalendarType::Google, self.id)
            .with_title(self.summary)
            .with_web_link(self.html_link)
            .with_raw(self.raw)
    }
}
