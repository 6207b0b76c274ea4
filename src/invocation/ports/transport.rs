//! Transport port through which prepared requests reach the target API.

use crate::invocation::domain::{HttpResponse, PreparedRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for transport operations.
pub type HttpTransportResult<T> = Result<T, HttpTransportError>;

/// Executes one prepared request.
///
/// Any status code, including error statuses, is a successful transport
/// outcome; only failures to obtain a response are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and returns the complete response.
    async fn send(&self, request: &PreparedRequest) -> HttpTransportResult<HttpResponse>;
}

/// Errors returned by transport adapters.
#[derive(Debug, Clone, Error)]
pub enum HttpTransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The request could not be sent or its response could not be read.
    #[error("HTTP transport error: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),
}

impl HttpTransportError {
    /// Wraps a client-level failure.
    pub fn request(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request(Arc::new(err))
    }
}
