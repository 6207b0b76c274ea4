//! In-memory description loader for tests and embedding.

use crate::description::{
    domain::DescriptionLocation,
    ports::{DescriptionLoadError, DescriptionLoadResult, DescriptionLoader},
};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicUsize, Ordering},
};

/// Loader serving documents registered by location string.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDescriptionLoader {
    documents: Arc<RwLock<IndexMap<String, Value>>>,
    loads: Arc<AtomicUsize>,
}

impl InMemoryDescriptionLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the document served for `location`.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionLoadError::Io`] when the lock is poisoned.
    pub fn insert(&self, location: &DescriptionLocation, document: Value) -> DescriptionLoadResult<()> {
        let mut documents = self.documents.write().map_err(|err| {
            DescriptionLoadError::io(location, std::io::Error::other(err.to_string()))
        })?;
        documents.insert(location.to_string(), document);
        Ok(())
    }

    /// Returns how many loads have been attempted.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DescriptionLoader for InMemoryDescriptionLoader {
    async fn load(&self, location: &DescriptionLocation) -> DescriptionLoadResult<Value> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let documents = self.documents.read().map_err(|err| {
            DescriptionLoadError::io(location, std::io::Error::other(err.to_string()))
        })?;
        documents
            .get(&location.to_string())
            .cloned()
            .ok_or_else(|| DescriptionLoadError::NotFound(location.to_string()))
    }
}
