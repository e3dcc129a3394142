//! Task records and calendar provider tags.
//!
//! A [`TaskData`] is the provider-agnostic shape of a single task that can be
//! pushed to a calendar. It is built by the caller for one sync request and
//! never persisted. [`CalendarType`] names the provider the task is sent to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A task to be synchronized with a calendar provider.
///
/// Timestamps are kept as strings and handed to the provider untouched; no
/// validation happens before dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    /// Event title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Start timestamp, usually RFC3339.
    pub start_date_time: String,
    /// End timestamp, usually RFC3339.
    pub end_date_time: String,
}

impl TaskData {
    /// Creates a task with an empty description.
    pub fn new(
        title: impl Into<String>,
        start_date_time: impl Into<String>,
        end_date_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            start_date_time: start_date_time.into(),
            end_date_time: end_date_time.into(),
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Returned when a calendar tag is neither `"Google"` nor `"Outlook"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported calendar type")]
pub struct UnsupportedCalendarType {
    /// The tag that was rejected.
    pub tag: String,
}

/// The calendar providers a task can be synced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalendarType {
    /// Google Calendar API v3.
    Google,
    /// Outlook calendar through Microsoft Graph.
    Outlook,
}

impl CalendarType {
    /// Returns the tag used to select this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Outlook => "Outlook",
        }
    }

    /// Returns the provider name used in logs and errors.
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Outlook => "outlook",
        }
    }
}

impl fmt::Display for CalendarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarType {
    type Err = UnsupportedCalendarType;

    /// Tags are matched exactly; `"google"` is not `"Google"`.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "Google" => Ok(Self::Google),
            "Outlook" => Ok(Self::Outlook),
            other => Err(UnsupportedCalendarType {
                tag: other.to_string(),
            }),
        }
    }
}
