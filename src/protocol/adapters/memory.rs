//! Bounded in-memory session store.

use crate::protocol::{
    domain::{Session, SessionId},
    ports::{SessionStore, SessionStoreError, SessionStoreResult},
};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Number of sessions kept when no capacity is configured.
pub const DEFAULT_SESSION_CAPACITY: usize = 1024;

/// Thread-safe in-memory session store.
///
/// Sessions are kept in creation order. Creating a session at capacity
/// evicts the oldest one; re-creating an existing identifier moves it to
/// the newest position.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    state: Arc<RwLock<IndexMap<SessionId, Session>>>,
    capacity: usize,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SESSION_CAPACITY)
    }
}

impl InMemorySessionStore {
    /// Creates a store bounded to [`DEFAULT_SESSION_CAPACITY`] sessions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store bounded to `capacity` sessions (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(IndexMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Returns the configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of stored sessions.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Persistence`] when the lock is poisoned.
    pub fn len(&self) -> SessionStoreResult<usize> {
        let state = self.state.read().map_err(|err| {
            SessionStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.len())
    }

    /// Returns whether no sessions are stored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Persistence`] when the lock is poisoned.
    pub fn is_empty(&self) -> SessionStoreResult<bool> {
        self.len().map(|len| len == 0)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &SessionId) -> SessionStoreResult<Option<Session>> {
        let state = self.state.read().map_err(|err| {
            SessionStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(session_id).cloned())
    }

    async fn create(&self, session: &Session) -> SessionStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            SessionStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;

        state.shift_remove(session.id());
        while state.len() >= self.capacity {
            let Some((evicted, _)) = state.shift_remove_index(0) else {
                break;
            };
            debug!(session = %evicted, "evicted oldest session");
        }

        state.insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> SessionStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            SessionStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let slot = state
            .get_mut(session.id())
            .ok_or_else(|| SessionStoreError::NotFound(session.id().clone()))?;
        if slot.created_at() != session.created_at() {
            return Err(SessionStoreError::Superseded(session.id().clone()));
        }
        *slot = session.clone();
        Ok(())
    }
}
