//! The JSON-RPC error taxonomy surfaced by the router.

use crate::protocol::{
    domain::{
        ArgumentError, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JsonRpcError,
        METHOD_NOT_FOUND, PARSE_ERROR, SESSION_NOT_INITIALIZED, SUPPORTED_PROTOCOL_VERSIONS,
    },
    ports::{SessionStoreError, ToolExecutionError},
};
use serde_json::{Value, json};
use thiserror::Error;

/// Errors answered with a JSON-RPC error envelope.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    /// The envelope is not a valid JSON-RPC request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The method is not served.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// `initialize` did not name a protocol version.
    #[error("missing protocolVersion")]
    MissingProtocolVersion,

    /// `initialize` requested a version this server does not speak.
    #[error("unsupported protocol version")]
    UnsupportedProtocolVersion {
        /// The requested value, echoed back as error data.
        requested: Value,
    },

    /// The parameters have the wrong shape.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// The `tools/list` cursor is not a decimal offset.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    /// `tools/call` did not name a tool.
    #[error("missing tool name")]
    MissingToolName,

    /// No tool with the requested name exists in the session's registry.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Arguments failed validation.
    #[error(transparent)]
    InvalidArguments(#[from] ArgumentError),

    /// The session has not completed the handshake.
    #[error("session not initialized")]
    SessionNotInitialized,

    /// The executor reported a failure.
    #[error("tool execution failed: {0}")]
    ExecutionFailed(#[from] ToolExecutionError),

    /// The session store reported a failure.
    #[error("session store failure: {0}")]
    SessionStore(#[from] SessionStoreError),

    /// An unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),

    /// The host could not decode the envelope or load the description.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ProtocolError {
    /// Returns the JSON-RPC error code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::InvalidRequest(_) => INVALID_REQUEST,
            Self::MethodNotFound(_) => METHOD_NOT_FOUND,
            Self::MissingProtocolVersion
            | Self::UnsupportedProtocolVersion { .. }
            | Self::InvalidParams(_)
            | Self::InvalidCursor(_)
            | Self::MissingToolName
            | Self::ToolNotFound(_)
            | Self::InvalidArguments(_) => INVALID_PARAMS,
            Self::SessionNotInitialized => SESSION_NOT_INITIALIZED,
            Self::ExecutionFailed(_) | Self::SessionStore(_) | Self::Internal(_) => INTERNAL_ERROR,
            Self::Parse(_) => PARSE_ERROR,
        }
    }

    /// Returns the structured payload attached to the wire error.
    #[must_use]
    pub fn data(&self) -> Option<Value> {
        match self {
            Self::UnsupportedProtocolVersion { requested } => Some(json!({
                "supported": SUPPORTED_PROTOCOL_VERSIONS,
                "requested": requested,
            })),
            Self::ToolNotFound(name) => Some(json!({ "name": name })),
            Self::InvalidArguments(error) => Some(error.data()),
            Self::ExecutionFailed(error) => {
                let mut data = match error.details() {
                    Some(Value::Object(details)) => details.clone(),
                    Some(other) => {
                        let mut details = serde_json::Map::new();
                        details.insert("details".to_owned(), other.clone());
                        details
                    }
                    None => serde_json::Map::new(),
                };
                data.insert("cause".to_owned(), Value::String(error.to_string()));
                Some(Value::Object(data))
            }
            Self::SessionStore(error) => Some(json!({ "cause": error.to_string() })),
            _ => None,
        }
    }

    /// Converts the error into its wire representation.
    #[must_use]
    pub fn to_json_rpc_error(&self) -> JsonRpcError {
        JsonRpcError::from_parts(self.code(), self.to_string(), self.data())
    }
}
