//! Immutable tool registry and its swappable shared handle.

use super::{ToolDefinition, ToolDomainError};
use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Ordered collection of compiled tools with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolRegistry {
    tools: IndexMap<String, ToolDefinition>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry, preserving the order of `tools`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolDomainError::DuplicateToolName`] when two tools share a
    /// name.
    pub fn from_tools(
        tools: impl IntoIterator<Item = ToolDefinition>,
    ) -> Result<Self, ToolDomainError> {
        let mut registry = Self::new();
        for tool in tools {
            registry.insert(tool)?;
        }
        Ok(registry)
    }

    /// Appends a tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolDomainError::DuplicateToolName`] when the name is taken.
    pub fn insert(&mut self, tool: ToolDefinition) -> Result<(), ToolDomainError> {
        let name = tool.name().as_str().to_owned();
        if self.tools.contains_key(&name) {
            return Err(ToolDomainError::DuplicateToolName(name));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Finds a tool by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Returns whether a tool with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Iterates over tools in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    /// Returns at most `limit` tools starting at `offset`.
    ///
    /// Offsets past the end yield an empty page.
    #[must_use]
    pub fn page(&self, offset: usize, limit: usize) -> Vec<&ToolDefinition> {
        self.tools.values().skip(offset).take(limit).collect()
    }

    /// Returns the number of tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns whether the registry holds no tools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Thread-safe handle to the current registry.
///
/// Readers receive an `Arc` snapshot; [`SharedToolRegistry::replace`] swaps
/// the whole registry at once, so no reader observes a partial update.
#[derive(Debug, Default)]
pub struct SharedToolRegistry {
    current: RwLock<Arc<ToolRegistry>>,
}

impl SharedToolRegistry {
    /// Creates a handle pointing at `registry`.
    #[must_use]
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    /// Returns a snapshot of the current registry.
    #[must_use]
    pub fn current(&self) -> Arc<ToolRegistry> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Installs a new registry; snapshots taken earlier are unaffected.
    pub fn replace(&self, registry: ToolRegistry) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(registry);
    }
}
