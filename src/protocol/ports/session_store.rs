//! Storage port for client sessions.

use crate::protocol::domain::{Session, SessionId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for session store operations.
pub type SessionStoreResult<T> = Result<T, SessionStoreError>;

/// Persistence contract for client sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Finds a session by identifier.
    async fn load(&self, session_id: &SessionId) -> SessionStoreResult<Option<Session>>;

    /// Stores a freshly negotiated session, replacing any session with the
    /// same identifier.
    ///
    /// Bounded stores may evict older sessions to make room.
    async fn create(&self, session: &Session) -> SessionStoreResult<()>;

    /// Persists changes to an existing session.
    ///
    /// The stored session must be the one `session` was loaded from: a
    /// session renegotiated under the same identifier since then is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::NotFound`] when the session no longer
    /// exists and [`SessionStoreError::Superseded`] when it was
    /// renegotiated after `session` was loaded.
    async fn update(&self, session: &Session) -> SessionStoreResult<()>;
}

/// Errors returned by session store implementations.
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    /// The session was not found.
    #[error("session not found: {0}")]
    NotFound(SessionId),

    /// The session was renegotiated after the caller loaded it.
    #[error("session superseded by a newer negotiation: {0}")]
    Superseded(SessionId),

    /// Persistence-layer failure.
    #[error("session store error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SessionStoreError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
