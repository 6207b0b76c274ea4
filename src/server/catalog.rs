//! Lazily compiled, periodically refreshed tool registry.

use crate::description::{
    domain::DescriptionLocation,
    ports::{DescriptionLoadResult, DescriptionLoader},
};
use crate::tool::{domain::ToolRegistry, services::compile_description};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Compiles the registry from one description location on demand.
///
/// Concurrent refreshes are serialized; a failed load leaves the catalog
/// due so the next request retries.
#[derive(Debug)]
pub struct ToolCatalog<L>
where
    L: DescriptionLoader,
{
    loader: Arc<L>,
    location: DescriptionLocation,
    refresh_interval: Option<Duration>,
    loaded_at: Mutex<Option<Instant>>,
}

impl<L> ToolCatalog<L>
where
    L: DescriptionLoader,
{
    /// Creates a catalog that has not loaded anything yet.
    #[must_use]
    pub fn new(
        loader: Arc<L>,
        location: DescriptionLocation,
        refresh_interval: Option<Duration>,
    ) -> Self {
        Self {
            loader,
            location,
            refresh_interval,
            loaded_at: Mutex::new(None),
        }
    }

    /// Returns the description location.
    #[must_use]
    pub const fn location(&self) -> &DescriptionLocation {
        &self.location
    }

    /// Records that the current registry was compiled just now.
    pub async fn mark_loaded(&self) {
        *self.loaded_at.lock().await = Some(Instant::now());
    }

    /// Loads and compiles the description.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when the document cannot be read.
    pub async fn compile(&self) -> DescriptionLoadResult<ToolRegistry> {
        let document = self.loader.load(&self.location).await?;
        let compilation = compile_description(&document);
        info!(
            location = %self.location,
            tools = compilation.registry.len(),
            skipped = compilation.skipped.len(),
            "compiled description"
        );
        Ok(compilation.registry)
    }

    /// Returns a freshly compiled registry when none has been loaded yet or
    /// the refresh interval has elapsed, and `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when the document cannot be read.
    pub async fn refresh_if_due(&self) -> DescriptionLoadResult<Option<ToolRegistry>> {
        let mut loaded_at = self.loaded_at.lock().await;
        let due = loaded_at.is_none_or(|at| {
            self.refresh_interval
                .is_some_and(|interval| at.elapsed() >= interval)
        });
        if !due {
            return Ok(None);
        }

        let registry = self.compile().await?;
        *loaded_at = Some(Instant::now());
        Ok(Some(registry))
    }
}
