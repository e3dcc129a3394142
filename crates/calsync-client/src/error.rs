//! Client error types.

use std::path::PathBuf;

use calsync_providers::ProviderError;
use thiserror::Error;

use crate::secret::SecretError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The config file could not be parsed.
    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A `pass::` or `env::` reference could not be resolved.
    #[error("failed to resolve {field}: {source}")]
    Secret {
        field: &'static str,
        #[source]
        source: SecretError,
    },

    /// Provider error.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Bad command-line input.
    #[error("invalid argument: {0}")]
    Usage(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The message followed by every `source()` in the chain.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let next = err.to_string();
            if !out.ends_with(&next) {
                out.push_str(": ");
                out.push_str(&next);
            }
            source = err.source();
        }
        out
    }
}
