//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calsync/config.toml` by default.
//!
//! Token values (`notion.token`, `google.access_token`,
//! `outlook.access_token`) support secret references:
//! - `pass::path/in/store` resolved via `pass show`
//! - `env::VAR_NAME` resolved from the environment
//! - plain text used as-is

use std::path::{Path, PathBuf};
use std::time::Duration;

use calsync_core::CalendarType;
use calsync_providers::google::{CALENDAR_API_BASE, PRIMARY_CALENDAR};
use calsync_providers::notion::{NOTION_API_BASE, NOTION_VERSION};
use calsync_providers::outlook::GRAPH_API_BASE;
use calsync_providers::{
    AccessToken, ApiBase, CalendarRouter, CalendarSettings, DEFAULT_TIMEOUT_SECS, NotionClient,
    PropertyMap, build_http_client,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::secret;

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the calsync client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Notion integration settings.
    pub notion: NotionSettings,

    /// Google Calendar settings.
    pub google: GoogleSettings,

    /// Outlook (Microsoft Graph) settings.
    pub outlook: OutlookSettings,

    /// Database property names used for task mapping.
    pub properties: PropertyMap,

    /// HTTP settings shared by all clients.
    pub http: HttpSettings,
}

/// Notion integration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionSettings {
    /// Integration token (supports `pass::` and `env::` prefixes).
    pub token: Option<String>,

    /// Database used when a command does not name one.
    pub database_id: Option<String>,

    /// `Notion-Version` header value.
    pub api_version: String,

    /// API base URL.
    pub base_url: String,
}

impl Default for NotionSettings {
    fn default() -> Self {
        Self {
            token: None,
            database_id: None,
            api_version: NOTION_VERSION.to_string(),
            base_url: NOTION_API_BASE.to_string(),
        }
    }
}

/// Google Calendar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// OAuth access token (supports `pass::` and `env::` prefixes).
    pub access_token: Option<String>,

    /// Calendar that events are inserted into.
    pub calendar_id: String,

    /// API base URL.
    pub base_url: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            access_token: None,
            calendar_id: PRIMARY_CALENDAR.to_string(),
            base_url: CALENDAR_API_BASE.to_string(),
        }
    }
}

/// Outlook settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlookSettings {
    /// Graph access token (supports `pass::` and `env::` prefixes).
    pub access_token: Option<String>,

    /// Graph base URL.
    pub base_url: String,
}

impl Default for OutlookSettings {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: GRAPH_API_BASE.to_string(),
        }
    }
}

/// HTTP settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path. A missing file yields the
    /// defaults.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|source| ClientError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calsync")
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Router settings from the `[google]`, `[outlook]` and `[http]` sections.
    pub fn calendar_settings(&self) -> CalendarSettings {
        CalendarSettings {
            google_base_url: self.google.base_url.clone(),
            google_calendar_id: self.google.calendar_id.clone(),
            outlook_base_url: self.outlook.base_url.clone(),
            timeout: self.timeout(),
        }
    }

    /// Builds the calendar router.
    pub fn router(&self) -> ClientResult<CalendarRouter> {
        Ok(CalendarRouter::new(self.calendar_settings())?)
    }

    /// Builds a Notion client. The token is required.
    pub fn notion_client(&self) -> ClientResult<NotionClient> {
        let raw = self.notion.token.as_deref().ok_or_else(|| {
            ClientError::Config(format!(
                "Notion token not found. Add to {}:\n  \
                 [notion]\n  \
                 token = \"env::NOTION_TOKEN\"",
                Self::default_path().display()
            ))
        })?;
        let token = resolve_token("notion.token", raw)?;
        let base = ApiBase::parse(&self.notion.base_url)?;
        Ok(NotionClient::new(build_http_client(self.timeout())?, base, token)
            .with_notion_version(&self.notion.api_version))
    }

    /// The calendar token from config. An unset token yields a blank one,
    /// which the adapter reports as an authentication failure.
    pub fn calendar_token(&self, calendar_type: CalendarType) -> ClientResult<AccessToken> {
        let (field, value) = match calendar_type {
            CalendarType::Google => ("google.access_token", &self.google.access_token),
            CalendarType::Outlook => ("outlook.access_token", &self.outlook.access_token),
        };
        match value {
            Some(raw) => resolve_token(field, raw),
            None => Ok(AccessToken::default()),
        }
    }

    /// Picks the database from an explicit argument or `notion.database_id`.
    pub fn database_id(&self, explicit: Option<String>) -> ClientResult<String> {
        explicit
            .or_else(|| self.notion.database_id.clone())
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                ClientError::Usage(
                    "no database given; pass --database-id or set notion.database_id".to_string(),
                )
            })
    }

    /// Checks base URLs, the timeout and any configured secret references.
    pub fn validate(&self) -> ClientResult<()> {
        if self.http.timeout_secs == 0 {
            return Err(ClientError::Config("http.timeout_secs must be positive".to_string()));
        }
        for (field, url) in [
            ("notion.base_url", &self.notion.base_url),
            ("google.base_url", &self.google.base_url),
            ("outlook.base_url", &self.outlook.base_url),
        ] {
            ApiBase::parse(url)
                .map_err(|e| ClientError::Config(format!("{}: {}", field, e)))?;
        }
        if self.google.calendar_id.trim().is_empty() {
            return Err(ClientError::Config("google.calendar_id must not be empty".to_string()));
        }
        for (field, value) in self.tokens() {
            if let Some(raw) = value {
                resolve_token(field, raw)?;
            }
        }
        Ok(())
    }

    /// A copy with plain-text tokens masked. References are kept.
    pub fn redacted(&self) -> Self {
        let mask = |value: &Option<String>| {
            value.as_ref().map(|v| {
                if secret::is_reference(v) {
                    v.clone()
                } else {
                    "***".to_string()
                }
            })
        };
        let mut config = self.clone();
        config.notion.token = mask(&self.notion.token);
        config.google.access_token = mask(&self.google.access_token);
        config.outlook.access_token = mask(&self.outlook.access_token);
        config
    }

    fn tokens(&self) -> [(&'static str, &Option<String>); 3] {
        [
            ("notion.token", &self.notion.token),
            ("google.access_token", &self.google.access_token),
            ("outlook.access_token", &self.outlook.access_token),
        ]
    }
}

fn resolve_token(field: &'static str, raw: &str) -> ClientResult<AccessToken> {
    secret::resolve(raw)
        .map(AccessToken::new)
        .map_err(|source| ClientError::Secret { field, source })
}
