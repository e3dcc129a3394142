//! Google Calendar adapter.
//!
//! [`GoogleCalendarClient`] maps a task to a Google `Event` resource
//! (`summary`, `description`, UTC `start`/`end`) and inserts it into the
//! `primary` calendar, or into the calendar set with
//! [`GoogleCalendarClient::with_calendar_id`].

mod client;

pub use client::{ApiEvent, CALENDAR_API_BASE, GoogleCalendarClient, PRIMARY_CALENDAR};
