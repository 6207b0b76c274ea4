//! Error type for tool invocation.

use crate::invocation::{domain::RequestBuildError, ports::HttpTransportError};
use serde_json::{Value, json};
use thiserror::Error;

/// Errors raised while invoking a tool's HTTP operation.
#[derive(Debug, Clone, Error)]
pub enum InvocationError {
    /// The request could not be built from the arguments.
    #[error(transparent)]
    Request(#[from] RequestBuildError),

    /// No response was obtained.
    #[error(transparent)]
    Transport(#[from] HttpTransportError),

    /// The API answered with a non-2xx status.
    #[error("upstream returned {status}")]
    HttpStatus {
        /// Response status code.
        status: u16,
        /// Response body, truncated for diagnostics.
        body: String,
    },

    /// The response claimed to be JSON but did not parse.
    #[error("invalid JSON response: {0}")]
    InvalidJsonResponse(String),
}

impl InvocationError {
    /// Returns the structured payload forwarded to the client, if any.
    #[must_use]
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::HttpStatus { status, body } => Some(json!({ "status": status, "body": body })),
            Self::Request(RequestBuildError::MissingPathParameter(parameter)) => {
                Some(json!({ "parameter": parameter }))
            }
            Self::Request(RequestBuildError::InvalidUrl { url, .. }) => Some(json!({ "url": url })),
            Self::Transport(HttpTransportError::Timeout) => Some(json!({ "timeout": true })),
            Self::Transport(HttpTransportError::Request(_)) | Self::InvalidJsonResponse(_) => None,
        }
    }
}
