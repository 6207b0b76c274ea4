//! Error types for tool domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing tool domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolDomainError {
    /// The tool name is empty after normalization.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// The tool name contains characters outside `[a-z0-9_]`.
    #[error(
        "tool name '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidToolName(String),

    /// Two tools in one registry share a name.
    #[error("duplicate tool name in registry: {0}")]
    DuplicateToolName(String),
}

/// Error returned while parsing an HTTP method token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported HTTP method: {0}")]
pub struct ParseHttpMethodError(pub String);
