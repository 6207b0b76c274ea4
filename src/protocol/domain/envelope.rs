//! JSON-RPC 2.0 envelopes and their classification.

use super::RequestId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The only protocol tag accepted on incoming envelopes.
pub const JSONRPC_VERSION: &str = "2.0";

/// A classified incoming envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolMessage {
    /// A call that expects a response.
    Request {
        /// Correlation identifier echoed in the response.
        id: RequestId,
        /// Method name.
        method: String,
        /// Method parameters, if any.
        params: Option<Value>,
    },
    /// A call without an identifier; never answered on success.
    Notification {
        /// Method name.
        method: String,
        /// Method parameters, if any.
        params: Option<Value>,
    },
    /// A response sent by the client.
    Response(JsonRpcResponse),
}

impl ProtocolMessage {
    /// Classifies a decoded JSON value.
    ///
    /// A `null` identifier is treated as absent, so such an envelope is a
    /// notification.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEnvelope`] when the value is not an object, the
    /// `jsonrpc` tag is not `"2.0"`, the identifier or method has the wrong
    /// type, or neither a method nor a response outcome is present.
    pub fn parse(value: Value) -> Result<Self, InvalidEnvelope> {
        let Value::Object(mut fields) = value else {
            return Err(InvalidEnvelope::new(None, "envelope must be a JSON object"));
        };

        let id = match fields.remove("id") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(RequestId::String(text)),
            Some(Value::Number(number)) => match number.as_i64() {
                Some(integer) => Some(RequestId::Number(integer)),
                None => return Err(InvalidEnvelope::new(None, "id must be an integer or a string")),
            },
            Some(_) => return Err(InvalidEnvelope::new(None, "id must be an integer or a string")),
        };

        if fields.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(InvalidEnvelope::new(id, "jsonrpc must be \"2.0\""));
        }

        let params = fields.remove("params").filter(|value| !value.is_null());
        match fields.remove("method") {
            Some(Value::String(method)) => Ok(match id {
                Some(request_id) => Self::Request {
                    id: request_id,
                    method,
                    params,
                },
                None => Self::Notification { method, params },
            }),
            Some(_) => Err(InvalidEnvelope::new(id, "method must be a string")),
            None => Self::parse_response(id, fields),
        }
    }

    fn parse_response(
        id: Option<RequestId>,
        mut fields: serde_json::Map<String, Value>,
    ) -> Result<Self, InvalidEnvelope> {
        if let Some(result) = fields.remove("result") {
            return Ok(Self::Response(JsonRpcResponse::new(
                id,
                ResponseOutcome::Result(result),
            )));
        }

        let Some(error) = fields.remove("error") else {
            return Err(InvalidEnvelope::new(id, "missing method"));
        };
        serde_json::from_value::<JsonRpcError>(error)
            .map(|decoded| {
                Self::Response(JsonRpcResponse::new(
                    id.clone(),
                    ResponseOutcome::Error(decoded),
                ))
            })
            .map_err(|err| InvalidEnvelope::new(id, format!("malformed error object: {err}")))
    }

    /// Returns the method name of requests and notifications.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::Request { method, .. } | Self::Notification { method, .. } => Some(method),
            Self::Response(_) => None,
        }
    }
}

/// An envelope that could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct InvalidEnvelope {
    /// Identifier recovered from the envelope, when readable.
    pub id: Option<RequestId>,
    /// Why the envelope was rejected.
    pub reason: String,
}

impl InvalidEnvelope {
    /// Creates a rejection.
    #[must_use]
    pub fn new(id: Option<RequestId>, reason: impl Into<String>) -> Self {
        Self {
            id,
            reason: reason.into(),
        }
    }
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcError {
    /// Creates an error object without data.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Creates an error object with an optional data payload.
    #[must_use]
    pub fn from_parts(code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    /// Attaches a data payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns the numeric error code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the optional data payload.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

/// Either the result or the error of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseOutcome {
    /// Successful result payload.
    Result(Value),
    /// Failure description.
    Error(JsonRpcError),
}

/// A response envelope.
///
/// The identifier serializes as `null` when it is unknown, as required for
/// errors raised before the request id could be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<RequestId>,
    #[serde(flatten)]
    outcome: ResponseOutcome,
}

impl JsonRpcResponse {
    /// Creates a response with the given outcome.
    #[must_use]
    pub fn new(id: Option<RequestId>, outcome: ResponseOutcome) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id,
            outcome,
        }
    }

    /// Creates a successful response.
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self::new(Some(id), ResponseOutcome::Result(result))
    }

    /// Creates a failed response.
    #[must_use]
    pub fn failure(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self::new(id, ResponseOutcome::Error(error))
    }

    /// Returns the correlation identifier.
    #[must_use]
    pub const fn id(&self) -> Option<&RequestId> {
        self.id.as_ref()
    }

    /// Returns the outcome.
    #[must_use]
    pub const fn outcome(&self) -> &ResponseOutcome {
        &self.outcome
    }

    /// Returns the result payload of a successful response.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match &self.outcome {
            ResponseOutcome::Result(result) => Some(result),
            ResponseOutcome::Error(_) => None,
        }
    }

    /// Returns the error of a failed response.
    #[must_use]
    pub const fn error(&self) -> Option<&JsonRpcError> {
        match &self.outcome {
            ResponseOutcome::Result(_) => None,
            ResponseOutcome::Error(error) => Some(error),
        }
    }
}
