//! Scripted in-memory transport that records every request.

use crate::invocation::{
    domain::{HttpResponse, PreparedRequest},
    ports::{HttpTransport, HttpTransportError, HttpTransportResult},
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

/// Transport answering from a queue of scripted outcomes.
///
/// Every request is recorded before the next scripted outcome is popped.
/// An exhausted script answers with a transport error.
#[derive(Debug, Clone, Default)]
pub struct RecordingHttpTransport {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    script: VecDeque<HttpTransportResult<HttpResponse>>,
    requests: Vec<PreparedRequest>,
}

impl RecordingHttpTransport {
    /// Creates a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpTransportError::Request`] when the lock is poisoned.
    pub fn push_response(&self, response: HttpResponse) -> HttpTransportResult<()> {
        self.push(Ok(response))
    }

    /// Queues a transport failure.
    ///
    /// # Errors
    ///
    /// Returns [`HttpTransportError::Request`] when the lock is poisoned.
    pub fn push_failure(&self, error: HttpTransportError) -> HttpTransportResult<()> {
        self.push(Err(error))
    }

    /// Returns the requests received so far.
    ///
    /// # Errors
    ///
    /// Returns [`HttpTransportError::Request`] when the lock is poisoned.
    pub fn requests(&self) -> HttpTransportResult<Vec<PreparedRequest>> {
        let state = self.state.read().map_err(|err| {
            HttpTransportError::request(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.requests.clone())
    }

    fn push(&self, outcome: HttpTransportResult<HttpResponse>) -> HttpTransportResult<()> {
        let mut state = self.state.write().map_err(|err| {
            HttpTransportError::request(std::io::Error::other(err.to_string()))
        })?;
        state.script.push_back(outcome);
        Ok(())
    }
}

#[async_trait]
impl HttpTransport for RecordingHttpTransport {
    async fn send(&self, request: &PreparedRequest) -> HttpTransportResult<HttpResponse> {
        let mut state = self.state.write().map_err(|err| {
            HttpTransportError::request(std::io::Error::other(err.to_string()))
        })?;
        state.requests.push(request.clone());
        state.script.pop_front().unwrap_or_else(|| {
            Err(HttpTransportError::request(std::io::Error::other(
                "no scripted response left",
            )))
        })
    }
}
