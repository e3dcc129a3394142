//! HTTP plumbing shared by the Google, Graph and Notion clients.
//!
//! Each client owns a [`reqwest::Client`] plus an [`ApiBase`]. Requests go
//! through [`send_json`], which turns transport failures and non-success
//! statuses into a [`ProviderError`] and decodes the body.

use std::fmt;
use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builds the HTTP client shared by all API clients.
pub fn build_http_client(timeout: Duration) -> ProviderResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("calsync/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))
}

/// A validated API base URL such as `https://api.notion.com/v1`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    /// Parses a base URL. Only absolute `http`/`https` URLs are accepted; a
    /// trailing slash is ignored.
    pub fn parse(base: &str) -> ProviderResult<Self> {
        let trimmed = base.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ProviderError::configuration("base URL must not be empty"));
        }
        let url = Url::parse(trimmed).map_err(|e| {
            ProviderError::configuration(format!("invalid base URL '{}'", trimmed)).with_source(e)
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ProviderError::configuration(format!(
                "base URL '{}' must be an http(s) URL",
                trimmed
            )));
        }
        Ok(Self(url))
    }

    /// Appends percent-encoded path segments to the base.
    pub fn join(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = self.0.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ProviderError::configuration("base URL cannot take a path"))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Returns the base as a string, without a trailing slash.
    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }
}

impl fmt::Debug for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiBase({})", self.as_str())
    }
}

/// Sends a request and decodes a JSON success body.
///
/// Errors are tagged with `provider`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> ProviderResult<T> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_transport(e).with_provider(provider))?;

    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        return Err(ProviderError::from_status(
            status,
            format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            ),
        )
        .with_provider(provider));
    }

    let body = response.text().await.map_err(|e| {
        ProviderError::network("failed to read response")
            .with_source(e)
            .with_provider(provider)
    })?;

    if !status.is_success() {
        let detail = api_error_message(&body).unwrap_or(body);
        debug!(provider, %status, "API returned an error");
        return Err(
            ProviderError::from_status(status, format!("API error ({}): {}", status, detail))
                .with_provider(provider),
        );
    }

    serde_json::from_str(&body).map_err(|e| {
        ProviderError::invalid_response("failed to parse response")
            .with_source(e)
            .with_provider(provider)
    })
}

/// Pulls the human-readable message out of an API error body.
///
/// Google and Graph nest it under `error.message`; Notion puts it at the top
/// level.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .or_else(|| value.get("message"))
        .and_then(|m| m.as_str())
        .map(String::from)
}
