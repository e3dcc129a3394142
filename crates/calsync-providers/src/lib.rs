//! Calendar adapters, dispatch router and Notion client.
//!
//! - [`CalendarAdapter`] - creates one calendar event from a [`TaskData`]
//! - [`CalendarRouter`] - picks the Google or Outlook adapter from a tag
//! - [`NotionClient`] - query, create, update and archive database pages
//! - [`sync_database`] - push every page of a database to a calendar
//!
//! # Architecture
//!
//! ```text
//!   TaskData + "Google" | "Outlook" + AccessToken
//!                      │
//!                      ▼
//!              ┌───────────────┐
//!              │ CalendarRouter│──── unknown tag ──▶ SyncError::UnsupportedCalendar
//!              └───────┬───────┘
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌──────────────────┐   ┌───────────────────────┐
//! │GoogleCalendar    │   │OutlookCalendarClient  │
//! │Client            │   │ POST /me/events       │
//! │ POST /calendars/ │   └──────────┬────────────┘
//! │  {id}/events     │              │
//! └────────┬─────────┘              │
//!          └───────────┬────────────┘
//!                      ▼
//!          SyncResult = Result<SyncedEvent, SyncError>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use calsync_providers::{AccessToken, CalendarRouter, CalendarSettings};
//!
//! let router = CalendarRouter::new(CalendarSettings::default())?;
//! let result = router
//!     .sync_with_calendar(&task, "Google", &AccessToken::new(token))
//!     .await;
//! ```

pub mod auth;
pub mod database_sync;
pub mod error;
pub mod google;
pub mod http;
pub mod notion;
pub mod outlook;
pub mod payload;
pub mod provider;
pub mod sync;

pub use calsync_core::{CalendarType, TaskData};

pub use auth::AccessToken;
pub use database_sync::{DatabaseSync, PageSyncError, PageSyncOutcome, sync_database};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use http::{ApiBase, DEFAULT_TIMEOUT_SECS, build_http_client};
pub use notion::{MappingError, NotionClient, NotionPage, PropertyMap};
pub use provider::{BoxFuture, CalendarAdapter, SyncedEvent};
pub use sync::{
    CalendarRouter, CalendarSettings, SyncError, SyncResult, sync_report, sync_with_adapter,
};
