//! Client sessions and protocol version negotiation.

use super::SessionId;
use crate::tool::domain::ToolRegistry;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Protocol versions this server negotiates, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];

/// Returns whether `version` is one of [`SUPPORTED_PROTOCOL_VERSIONS`].
#[must_use]
pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_PROTOCOL_VERSIONS.contains(&version)
}

/// Handshake progress of a stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// `initialize` succeeded; waiting for `initialized`.
    Negotiating,
    /// The handshake is complete.
    Active,
}

/// Per-client negotiation state.
///
/// Holds the registry snapshot taken at `initialize`, so a later registry
/// refresh does not change the tools an established session sees.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: SessionId,
    initialized: bool,
    protocol_version: String,
    client_capabilities: Map<String, Value>,
    registry: Arc<ToolRegistry>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session in the negotiating state.
    #[must_use]
    pub fn negotiate(
        id: SessionId,
        protocol_version: impl Into<String>,
        client_capabilities: Map<String, Value>,
        registry: Arc<ToolRegistry>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            initialized: false,
            protocol_version: protocol_version.into(),
            client_capabilities,
            registry,
            created_at: clock.utc(),
        }
    }

    /// Completes the handshake.
    ///
    /// Returns `false` when the session was already active.
    pub const fn activate(&mut self) -> bool {
        let transitioned = !self.initialized;
        self.initialized = true;
        transitioned
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns whether the handshake is complete.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the handshake state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        if self.initialized {
            SessionState::Active
        } else {
            SessionState::Negotiating
        }
    }

    /// Returns the negotiated protocol version.
    #[must_use]
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Returns the capabilities the client declared.
    #[must_use]
    pub const fn client_capabilities(&self) -> &Map<String, Value> {
        &self.client_capabilities
    }

    /// Returns the registry snapshot bound to this session.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Returns when the session was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
