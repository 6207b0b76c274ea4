//! Normalized result of a successful tool invocation.

use serde_json::Value;

/// Body returned by a tool's HTTP operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    /// A response whose content type indicated JSON.
    Json(Value),
    /// Any other response, kept as raw text.
    Text(String),
}

impl ToolOutput {
    /// Returns the JSON-serialized form placed in a text content block.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => Value::String(text.clone()).to_string(),
        }
    }
}
