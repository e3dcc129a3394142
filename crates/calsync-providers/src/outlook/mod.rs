//! Outlook calendar adapter over Microsoft Graph.
//!
//! [`OutlookCalendarClient`] maps a task to a Graph `event` (`subject`, HTML
//! `body`, UTC `start`/`end`) and posts it to the signed-in user's
//! `/me/events` collection.

mod client;

pub use client::{GRAPH_API_BASE, GraphEvent, OutlookCalendarClient};
