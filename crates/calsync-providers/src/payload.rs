//! Task payload builders.
//!
//! Pure mappings from a [`TaskData`] to the event resource each provider's
//! create endpoint expects. Times are passed through verbatim and tagged with
//! the `UTC` time zone.

use calsync_core::TaskData;
use serde::Serialize;

/// Time zone attached to every start/end wrapper.
pub const UTC_TIME_ZONE: &str = "UTC";

/// A `{dateTime, timeZone}` wrapper. Google and Graph share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

impl EventDateTime {
    /// Wraps a timestamp in the UTC zone.
    pub fn utc(date_time: impl Into<String>) -> Self {
        Self {
            date_time: date_time.into(),
            time_zone: UTC_TIME_ZONE.to_string(),
        }
    }
}

/// Body of a Google Calendar `events.insert` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventPayload {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Content type of a Graph item body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BodyContentType {
    #[serde(rename = "HTML")]
    Html,
}

/// Graph `itemBody`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookItemBody {
    pub content_type: BodyContentType,
    pub content: String,
}

/// Body of a Microsoft Graph `POST /me/events` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookEventPayload {
    pub subject: String,
    pub body: OutlookItemBody,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Maps a task to a Google event: title becomes `summary`.
pub fn google_event(task: &TaskData) -> GoogleEventPayload {
    GoogleEventPayload {
        summary: task.title.clone(),
        description: task.description.clone(),
        start: EventDateTime::utc(&task.start_date_time),
        end: EventDateTime::utc(&task.end_date_time),
    }
}

/// Maps a task to a Graph event: title becomes `subject`, the description
/// becomes an HTML body.
pub fn outlook_event(task: &TaskData) -> OutlookEventPayload {
    OutlookEventPayload {
        subject: task.title.clone(),
        body: OutlookItemBody {
            content_type: BodyContentType::Html,
            content: task.description.clone(),
        },
        start: EventDateTime::utc(&task.start_date_time),
        end: EventDateTime::utc(&task.end_date_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> TaskData {
        TaskData::new(
            "Write report",
            "2024-01-01T10:00:00Z",
            "2024-01-01T11:00:00Z",
        )
        .with_description("Quarterly numbers")
    }

    #[test]
    fn google_payload_shape() {
        insta::assert_json_snapshot!(google_event(&task()), @r#"
        {
          "summary": "Write report",
          "description": "Quarterly numbers",
          "start": {
            "dateTime": "2024-01-01T10:00:00Z",
            "timeZone": "UTC"
          },
          "end": {
            "dateTime": "2024-01-01T11:00:00Z",
            "timeZone": "UTC"
          }
        }
        "#);
    }

    #[test]
    fn outlook_payload_shape() {
        insta::assert_json_snapshot!(outlook_event(&task()), @r#"
        {
          "subject": "Write report",
          "body": {
            "contentType": "HTML",
            "content": "Quarterly numbers"
          },
          "start": {
            "dateTime": "2024-01-01T10:00:00Z",
            "timeZone": "UTC"
          },
          "end": {
            "dateTime": "2024-01-01T11:00:00Z",
            "timeZone": "UTC"
          }
        }
        "#);
    }

    #[test]
    fn timestamps_pass_through_unvalidated() {
        let task = TaskData::new("", "tomorrow-ish", "");
        let google = google_event(&task);
        assert_eq!(google.start.date_time, "tomorrow-ish");
        assert_eq!(google.end.date_time, "");
        assert_eq!(google.summary, "");

        let outlook = outlook_event(&task);
        assert_eq!(outlook.subject, "");
        assert_eq!(outlook.start.time_zone, UTC_TIME_ZONE);
    }

    #[test]
    fn body_content_type_is_html() {
        let body = outlook_event(&TaskData::new("x", "a", "b")).body;
        assert_eq!(body.content_type, BodyContentType::Html);
        assert_eq!(
            serde_json::to_value(body.content_type).unwrap(),
            serde_json::json!("HTML")
        );
    }
}
