//! JSON-RPC error codes and argument validation errors.

use crate::tool::domain::SchemaKind;
use serde_json::{Value, json};
use thiserror::Error;

/// The envelope is not a valid request object.
pub const INVALID_REQUEST: i32 = -32_600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i32 = -32_601;
/// The method parameters are invalid.
pub const INVALID_PARAMS: i32 = -32_602;
/// Tool execution or another internal failure.
pub const INTERNAL_ERROR: i32 = -32_603;
/// The host could not parse the envelope or load the description.
pub const PARSE_ERROR: i32 = -32_700;
/// The session has not completed the initialize handshake.
pub const SESSION_NOT_INITIALIZED: i32 = -32_001;

/// Reasons a `tools/call` argument map is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A required argument is absent.
    #[error("missing required argument: {0}")]
    MissingRequired(String),

    /// An argument is not declared by the tool.
    #[error("unknown argument: {0}")]
    Unknown(String),

    /// An argument value does not match its schema kind.
    #[error("invalid type for argument '{name}': expected {expected}, got {actual}")]
    InvalidType {
        /// Argument name.
        name: String,
        /// Kind declared by the schema.
        expected: SchemaKind,
        /// JSON type of the supplied value.
        actual: &'static str,
    },
}

impl ArgumentError {
    /// Returns the name of the offending argument.
    #[must_use]
    pub fn argument(&self) -> &str {
        match self {
            Self::MissingRequired(name) | Self::Unknown(name) | Self::InvalidType { name, .. } => {
                name
            }
        }
    }

    /// Returns the structured payload attached to the wire error.
    #[must_use]
    pub fn data(&self) -> Value {
        match self {
            Self::InvalidType {
                name,
                expected,
                actual,
            } => json!({ "argument": name, "expected": expected.as_str(), "actual": actual }),
            Self::MissingRequired(name) | Self::Unknown(name) => json!({ "argument": name }),
        }
    }
}
