//! Command implementations.
//!
//! Data commands return a [`Report`]: the JSON printed on stdout and whether
//! the process should exit successfully.

pub mod config;
pub mod sync;
pub mod tasks;

use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Output of a data command.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub body: Value,
    pub ok: bool,
}

impl Report {
    pub fn ok(body: Value) -> Self {
        Self { body, ok: true }
    }

    pub fn failed(body: Value) -> Self {
        Self { body, ok: false }
    }
}

/// Parses a `--properties` argument. Must be a JSON object.
pub(crate) fn parse_properties(raw: &str) -> ClientResult<Value> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ClientError::Usage(format!("--properties is not valid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(ClientError::Usage("--properties must be a JSON object".to_string()));
    }
    Ok(value)
}
