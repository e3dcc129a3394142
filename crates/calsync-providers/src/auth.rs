//! Caller-supplied bearer tokens.

use std::fmt;

/// An OAuth access token for Google, Microsoft Graph, or a Notion
/// integration secret.
///
/// The token is used as-is; it is never stored or refreshed here.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the token is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            f.write_str("AccessToken(<empty>)")
        } else {
            f.write_str("AccessToken(***)")
        }
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let token = AccessToken::new("ya29.secret-value");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("secret"));
        assert_eq!(debug, "AccessToken(***)");
        assert_eq!(token.as_str(), "ya29.secret-value");
    }

    #[test]
    fn blank_tokens() {
        assert!(AccessToken::default().is_blank());
        assert!(AccessToken::from("   ").is_blank());
        assert!(!AccessToken::from("t").is_blank());
        assert_eq!(format!("{:?}", AccessToken::default()), "AccessToken(<empty>)");
    }
}
