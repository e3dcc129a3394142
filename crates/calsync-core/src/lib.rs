//! Core types: task records, calendar tags, timestamps, tracing

pub mod task;
pub mod time;
pub mod tracing;

pub use task::{CalendarType, TaskData, UnsupportedCalendarType};
pub use time::{TimeError, normalize_timestamp};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
