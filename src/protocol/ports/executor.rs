//! Execution port through which the router runs validated tool calls.

use crate::tool::domain::{ToolDefinition, ToolOutput};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Executes a tool whose arguments have already been validated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Runs `tool` with `arguments` and returns its output.
    async fn execute(
        &self,
        tool: &ToolDefinition,
        arguments: &Map<String, Value>,
    ) -> Result<ToolOutput, ToolExecutionError>;
}

/// Failure raised while executing a tool.
///
/// Carries the underlying cause and an optional structured payload that is
/// forwarded to the client as error data.
#[derive(Debug, Clone, Error)]
#[error("{cause}")]
pub struct ToolExecutionError {
    cause: Arc<dyn std::error::Error + Send + Sync>,
    details: Option<Value>,
}

impl ToolExecutionError {
    /// Wraps the cause of an execution failure.
    pub fn new(cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            cause: Arc::new(cause),
            details: None,
        }
    }

    /// Attaches structured details; `None` clears them.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<Option<Value>>) -> Self {
        self.details = details.into();
        self
    }

    /// Returns the structured details, if any.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}
