//! Dispatch router.
//!
//! [`CalendarRouter::sync_with_calendar`] selects the adapter for a provider
//! tag, runs it, and folds every outcome into a [`SyncResult`]. Provider
//! faults are logged here and wrapped in a [`SyncError`] whose message is
//! fixed per provider; the underlying [`ProviderError`] stays reachable through
//! `source()`.

use std::time::Duration;

use calsync_core::{CalendarType, TaskData};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::AccessToken;
use crate::error::{ProviderError, ProviderResult};
use crate::google::{CALENDAR_API_BASE, GoogleCalendarClient, PRIMARY_CALENDAR};
use crate::http::{ApiBase, DEFAULT_TIMEOUT_SECS, build_http_client};
use crate::outlook::{GRAPH_API_BASE, OutlookCalendarClient};
use crate::provider::{CalendarAdapter, SyncedEvent};

/// Why a sync did not produce an event.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The tag was neither `"Google"` nor `"Outlook"`. No request was made.
    #[error("Unsupported calendar type")]
    UnsupportedCalendar { tag: String },

    /// The Google insert call failed.
    #[error("Failed to sync with Google Calendar")]
    Google(#[source] ProviderError),

    /// The Graph post call failed.
    #[error("Failed to sync with Outlook Calendar")]
    Outlook(#[source] ProviderError),
}

impl SyncError {
    fn from_provider(calendar_type: CalendarType, err: ProviderError) -> Self {
        match calendar_type {
            CalendarType::Google => Self::Google(err),
            CalendarType::Outlook => Self::Outlook(err),
        }
    }

    /// The provider fault behind this error, if any.
    pub fn cause(&self) -> Option<&ProviderError> {
        match self {
            Self::UnsupportedCalendar { .. } => None,
            Self::Google(err) | Self::Outlook(err) => Some(err),
        }
    }

    /// The `{"error": "..."}` object reported to callers.
    pub fn to_json(&self) -> serde_json::Value {
        json!({ "error": self.to_string() })
    }
}

/// Outcome of one sync request.
pub type SyncResult = Result<SyncedEvent, SyncError>;

/// Renders a sync outcome as JSON: the provider's event on success, an
/// `{"error": ...}` object on failure.
pub fn sync_report(result: &SyncResult) -> serde_json::Value {
    match result {
        Ok(event) if !event.raw.is_null() => event.raw.clone(),
        Ok(event) => json!({ "id": event.id, "provider": event.provider }),
        Err(err) => err.to_json(),
    }
}

/// Runs one adapter and converts its fault into a [`SyncError`].
pub async fn sync_with_adapter(adapter: &dyn CalendarAdapter, task: &TaskData) -> SyncResult {
    let calendar_type = adapter.calendar_type();
    match adapter.create_event(task).await {
        Ok(event) => Ok(event),
        Err(err) => {
            error!(
                provider = calendar_type.provider_name(),
                error = %err,
                "error syncing with {} calendar",
                calendar_type
            );
            Err(SyncError::from_provider(calendar_type, err))
        }
    }
}

/// Endpoints and HTTP settings for the router.
#[derive(Debug, Clone)]
pub struct CalendarSettings {
    /// Google Calendar API base.
    pub google_base_url: String,
    /// Calendar that Google events are inserted into.
    pub google_calendar_id: String,
    /// Microsoft Graph base.
    pub outlook_base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            google_base_url: CALENDAR_API_BASE.to_string(),
            google_calendar_id: PRIMARY_CALENDAR.to_string(),
            outlook_base_url: GRAPH_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Picks a calendar adapter per request.
///
/// Holds one HTTP connection pool; adapters are built per call around the
/// caller's token.
#[derive(Debug, Clone)]
pub struct CalendarRouter {
    http_client: reqwest::Client,
    google_base: ApiBase,
    google_calendar_id: String,
    outlook_base: ApiBase,
}

impl CalendarRouter {
    /// Creates a router from settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid base URL or an empty
    /// calendar ID.
    pub fn new(settings: CalendarSettings) -> ProviderResult<Self> {
        if settings.google_calendar_id.trim().is_empty() {
            return Err(ProviderError::configuration("Google calendar ID must not be empty"));
        }
        Ok(Self {
            http_client: build_http_client(settings.timeout)?,
            google_base: ApiBase::parse(&settings.google_base_url)?,
            google_calendar_id: settings.google_calendar_id,
            outlook_base: ApiBase::parse(&settings.outlook_base_url)?,
        })
    }

    /// Builds a Google client around `auth`.
    pub fn google_client(&self, auth: &AccessToken) -> GoogleCalendarClient {
        GoogleCalendarClient::new(
            self.http_client.clone(),
            self.google_base.clone(),
            auth.clone(),
        )
        .with_calendar_id(&self.google_calendar_id)
    }

    /// Builds a Graph client around `auth`.
    pub fn outlook_client(&self, auth: &AccessToken) -> OutlookCalendarClient {
        OutlookCalendarClient::new(
            self.http_client.clone(),
            self.outlook_base.clone(),
            auth.clone(),
        )
    }

    /// Creates `task` on Google Calendar.
    pub async fn sync_google_calendar(&self, task: &TaskData, auth: &AccessToken) -> SyncResult {
        sync_with_adapter(&self.google_client(auth), task).await
    }

    /// Creates `task` on the user's Outlook calendar.
    pub async fn sync_outlook_calendar(&self, task: &TaskData, auth: &AccessToken) -> SyncResult {
        sync_with_adapter(&self.outlook_client(auth), task).await
    }

    /// Creates `task` on an already-parsed provider.
    pub async fn sync_with(
        &self,
        task: &TaskData,
        calendar_type: CalendarType,
        auth: &AccessToken,
    ) -> SyncResult {
        match calendar_type {
            CalendarType::Google => self.sync_google_calendar(task, auth).await,
            CalendarType::Outlook => self.sync_outlook_calendar(task, auth).await,
        }
    }

    /// Creates `task` on the provider named by `calendar_type`.
    ///
    /// The tag must be exactly `"Google"` or `"Outlook"`; anything else
    /// returns [`SyncError::UnsupportedCalendar`] without a network call.
    /// The task is not validated.
    pub async fn sync_with_calendar(
        &self,
        task: &TaskData,
        calendar_type: &str,
        auth: &AccessToken,
    ) -> SyncResult {
        match calendar_type.parse::<CalendarType>() {
            Ok(kind) => {
                debug!(provider = kind.provider_name(), title = %task.title, "dispatching task");
                self.sync_with(task, kind, auth).await
            }
            Err(unsupported) => {
                warn!(tag = %unsupported.tag, "unsupported calendar type");
                Err(SyncError::UnsupportedCalendar {
                    tag: unsupported.tag,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use crate::provider::BoxFuture;
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Adapter returning a canned result and counting calls.
    struct FakeAdapter {
        kind: CalendarType,
        fail: bool,
        calls: AtomicUsize,
    }

    impl CalendarAdapter for FakeAdapter {
        fn calendar_type(&self) -> CalendarType {
            self.kind
        }

        fn create_event<'a>(
            &'a self,
            task: &'a TaskData,
        ) -> BoxFuture<'a, ProviderResult<SyncedEvent>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = if self.fail {
                Err(ProviderError::bad_request("rejected"))
            } else {
                Ok(SyncedEvent::new(self.kind, "fake-1")
                    .with_title(Some(task.title.clone())))
            };
            Box::pin(async move { result })
        }
    }

    fn task() -> TaskData {
        TaskData::new("Ship it", "2024-06-01T12:00:00Z", "2024-06-01T13:00:00Z")
            .with_description("release day")
    }

    fn router_for(server: &MockServer) -> CalendarRouter {
        CalendarRouter::new(CalendarSettings {
            google_base_url: format!("{}/calendar/v3", server.uri()),
            outlook_base_url: format!("{}/v1.0", server.uri()),
            ..CalendarSettings::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn adapter_error_is_wrapped_with_cause() {
        let adapter = FakeAdapter {
            kind: CalendarType::Outlook,
            fail: true,
            calls: AtomicUsize::new(0),
        };
        let err = sync_with_adapter(&adapter, &task()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to sync with Outlook Calendar");
        assert_eq!(err.cause().unwrap().code(), ProviderErrorCode::BadRequest);
        assert!(err.source().is_some());
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn adapter_success_passes_through() {
        let adapter = FakeAdapter {
            kind: CalendarType::Google,
            fail: false,
            calls: AtomicUsize::new(0),
        };
        let event = sync_with_adapter(&adapter, &task()).await.unwrap();
        assert_eq!(event.id, "fake-1");
        assert_eq!(event.title.as_deref(), Some("Ship it"));
    }

    #[tokio::test]
    async fn google_tag_returns_google_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendar/v3/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "g-42",
                "summary": "Ship it"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = router_for(&server)
            .sync_with_calendar(&task(), "Google", &AccessToken::from("tok"))
            .await;
        let event = result.unwrap();
        assert_eq!(event.id, "g-42");
        assert_eq!(event.title.as_deref(), Some("Ship it"));
    }

    #[tokio::test]
    async fn outlook_tag_returns_outlook_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1.0/me/events"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "o-7",
                "subject": "Ship it"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = router_for(&server)
            .sync_with_calendar(&task(), "Outlook", &AccessToken::from("tok"))
            .await;
        let report = sync_report(&result);
        assert_eq!(report["id"], "o-7");
        assert_eq!(report["subject"], "Ship it");
    }

    #[tokio::test]
    async fn unknown_tag_is_unsupported_without_requests() {
        let server = MockServer::start().await;
        let router = router_for(&server);

        for tag in ["Apple", "google", "", "OUTLOOK"] {
            let err = router
                .sync_with_calendar(&task(), tag, &AccessToken::from("tok"))
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Unsupported calendar type");
            assert!(err.cause().is_none());
            assert_eq!(
                err.to_json(),
                serde_json::json!({"error": "Unsupported calendar type"})
            );
        }

        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn google_missing_auth_fails_with_fixed_message() {
        let server = MockServer::start().await;
        let err = router_for(&server)
            .sync_google_calendar(&task(), &AccessToken::default())
            .await
            .unwrap_err();
        assert_eq!(
            sync_report(&Err(err)),
            serde_json::json!({"error": "Failed to sync with Google Calendar"})
        );
    }

    #[tokio::test]
    async fn google_api_failure_keeps_cause() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"code": 403, "message": "Insufficient Permission"}
            })))
            .mount(&server)
            .await;

        let err = router_for(&server)
            .sync_with_calendar(&task(), "Google", &AccessToken::from("tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Google(_)));
        let cause = err.cause().unwrap();
        assert_eq!(cause.code(), ProviderErrorCode::AuthorizationFailed);
        assert!(cause.message().contains("Insufficient Permission"));
    }

    #[tokio::test]
    async fn outlook_empty_subject_fails_with_fixed_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1.0/me/events"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": "ErrorInvalidRequest", "message": "Subject is required."}
            })))
            .mount(&server)
            .await;

        let mut untitled = task();
        untitled.title.clear();
        let err = router_for(&server)
            .sync_outlook_calendar(&untitled, &AccessToken::from("tok"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to sync with Outlook Calendar");
        assert_eq!(err.cause().unwrap().status(), Some(400));
    }

    #[test]
    fn router_rejects_bad_settings() {
        let err = CalendarRouter::new(CalendarSettings {
            google_calendar_id: " ".to_string(),
            ..CalendarSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);

        assert!(
            CalendarRouter::new(CalendarSettings {
                outlook_base_url: "not a url".to_string(),
                ..CalendarSettings::default()
            })
            .is_err()
        );
    }

    #[test]
    fn report_without_raw_falls_back_to_summary() {
        let result: SyncResult = Ok(SyncedEvent::new(CalendarType::Google, "x1"));
        assert_eq!(
            sync_report(&result),
            serde_json::json!({"id": "x1", "provider": "Google"})
        );
    }
}
