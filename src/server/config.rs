//! Host configuration.

use crate::protocol::adapters::memory::DEFAULT_SESSION_CAPACITY;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Address the host listens on unless configured otherwise.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Errors raised while validating host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerConfigError {
    /// The bind address is not a socket address.
    #[error("invalid bind address '{bind}': {reason}")]
    InvalidBind {
        /// The rejected address.
        bind: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Listening address, registry refresh policy and session bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    bind: SocketAddr,
    refresh_interval: Option<Duration>,
    max_sessions: usize,
}

impl ServerConfig {
    /// Creates a configuration listening on `bind`.
    #[must_use]
    pub const fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            refresh_interval: None,
            max_sessions: DEFAULT_SESSION_CAPACITY,
        }
    }

    /// Creates a configuration from a textual socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerConfigError::InvalidBind`] when `bind` does not
    /// parse.
    pub fn parse(bind: &str) -> Result<Self, ServerConfigError> {
        bind.trim()
            .parse::<SocketAddr>()
            .map(Self::new)
            .map_err(|err| ServerConfigError::InvalidBind {
                bind: bind.to_owned(),
                reason: err.to_string(),
            })
    }

    /// Sets how often the description is recompiled; `None` loads it once.
    #[must_use]
    pub const fn with_refresh_interval(mut self, interval: Option<Duration>) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Bounds the number of retained sessions. Zero is raised to one.
    #[must_use]
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Returns the listening address.
    #[must_use]
    pub const fn bind(&self) -> SocketAddr {
        self.bind
    }

    /// Returns the refresh interval.
    #[must_use]
    pub const fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval
    }

    /// Returns the session bound.
    #[must_use]
    pub const fn max_sessions(&self) -> usize {
        self.max_sessions
    }
}
