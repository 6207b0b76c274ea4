//! Session and request identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session identifier used when the client supplies none.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Identifier correlating envelopes with one client session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a session identifier.
    ///
    /// Surrounding whitespace is trimmed; a blank value yields the default
    /// session.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let trimmed = value.into().trim().to_owned();
        if trimmed.is_empty() {
            return Self::default();
        }
        Self(trimmed)
    }

    /// Creates a session identifier from an optional header value.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        value.map_or_else(Self::default, Self::new)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self(DEFAULT_SESSION_ID.to_owned())
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// JSON-RPC request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric identifier.
    Number(i64),
    /// String identifier.
    String(String),
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(formatter, "{number}"),
            Self::String(text) => formatter.write_str(text),
        }
    }
}
