//! Executes compiled tools against the configured API.

use super::InvocationError;
use crate::invocation::{
    domain::{HttpResponse, InvokerConfig, prepare_request},
    ports::HttpTransport,
};
use crate::protocol::ports::{ToolExecutionError, ToolExecutor};
use crate::tool::domain::{ToolDefinition, ToolOutput};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{Span, debug, instrument, warn};

/// Invokes tools by issuing their HTTP operation through a transport.
#[derive(Debug)]
pub struct ToolInvoker<T>
where
    T: HttpTransport,
{
    config: Arc<InvokerConfig>,
    transport: Arc<T>,
}

impl<T> Clone for ToolInvoker<T>
where
    T: HttpTransport,
{
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> ToolInvoker<T>
where
    T: HttpTransport,
{
    /// Creates an invoker for the API described by `config`.
    #[must_use]
    pub const fn new(config: Arc<InvokerConfig>, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    /// Returns the invoker configuration.
    #[must_use]
    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Calls `tool` with already validated `arguments`.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError`] when the request cannot be built, the
    /// transport fails, the status is not 2xx, or a JSON body does not parse.
    #[instrument(
        skip_all,
        fields(tool = %tool.name(), method = %tool.operation().method(), url = tracing::field::Empty)
    )]
    pub async fn invoke(
        &self,
        tool: &ToolDefinition,
        arguments: &Map<String, Value>,
    ) -> Result<ToolOutput, InvocationError> {
        let request = prepare_request(&self.config, tool, arguments)?;
        Span::current().record("url", request.url());

        let response = self.transport.send(&request).await?;
        if !response.is_success() {
            warn!(status = response.status(), "upstream returned an error status");
            return Err(InvocationError::HttpStatus {
                status: response.status(),
                body: response.truncated_text(),
            });
        }

        debug!(
            status = response.status(),
            bytes = response.body().len(),
            "upstream call succeeded"
        );
        decode_response(&response)
    }
}

/// Decodes a successful response body.
///
/// Empty bodies yield empty text. JSON content types are parsed, anything
/// else is returned as text.
///
/// # Errors
///
/// Returns [`InvocationError::InvalidJsonResponse`] when a JSON content type
/// carries a body that does not parse.
pub fn decode_response(response: &HttpResponse) -> Result<ToolOutput, InvocationError> {
    if response.body().is_empty() {
        return Ok(ToolOutput::Text(String::new()));
    }
    if response.is_json() {
        return serde_json::from_slice(response.body())
            .map(ToolOutput::Json)
            .map_err(|err| InvocationError::InvalidJsonResponse(err.to_string()));
    }
    Ok(ToolOutput::Text(response.text()))
}

#[async_trait]
impl<T> ToolExecutor for ToolInvoker<T>
where
    T: HttpTransport,
{
    async fn execute(
        &self,
        tool: &ToolDefinition,
        arguments: &Map<String, Value>,
    ) -> Result<ToolOutput, ToolExecutionError> {
        self.invoke(tool, arguments).await.map_err(|err| {
            let details = err.details();
            ToolExecutionError::new(err).with_details(details)
        })
    }
}
