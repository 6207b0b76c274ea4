//! Session state machine and method dispatch.

use super::{ProtocolError, validate_arguments};
use crate::protocol::{
    domain::{JsonRpcResponse, ProtocolMessage, Session, SessionId, is_supported_version},
    ports::{SessionStore, ToolExecutor},
};
use crate::tool::domain::{SharedToolRegistry, ToolRegistry};
use mockable::Clock;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Number of tools returned per `tools/list` page.
pub const PAGE_SIZE: usize = 50;

/// Name and version reported in the `initialize` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    name: String,
    version: String,
}

impl ServerInfo {
    /// Creates server identification.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Returns the server name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the server version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// Routes envelopes through the per-session state machine.
///
/// `initialize` and `ping` are served in any state. Every other method
/// requires an active session; `tools/list` and `tools/call` read the
/// registry snapshot the session captured at `initialize`.
#[derive(Clone)]
pub struct ProtocolRouter<S, E, C>
where
    S: SessionStore,
    E: ToolExecutor,
    C: Clock + Send + Sync,
{
    sessions: Arc<S>,
    executor: Arc<E>,
    clock: Arc<C>,
    registry: Arc<SharedToolRegistry>,
    server_info: ServerInfo,
}

impl<S, E, C> ProtocolRouter<S, E, C>
where
    S: SessionStore,
    E: ToolExecutor,
    C: Clock + Send + Sync,
{
    /// Creates a router serving `registry`.
    #[must_use]
    pub fn new(sessions: Arc<S>, executor: Arc<E>, clock: Arc<C>, registry: ToolRegistry) -> Self {
        Self {
            sessions,
            executor,
            clock,
            registry: Arc::new(SharedToolRegistry::new(registry)),
            server_info: ServerInfo::default(),
        }
    }

    /// Overrides the reported server identification.
    #[must_use]
    pub fn with_server_info(mut self, server_info: ServerInfo) -> Self {
        self.server_info = server_info;
        self
    }

    /// Returns the registry new sessions will capture.
    #[must_use]
    pub fn registry(&self) -> Arc<ToolRegistry> {
        self.registry.current()
    }

    /// Atomically installs a new registry for sessions created from now on.
    pub fn replace_registry(&self, registry: ToolRegistry) {
        info!(tools = registry.len(), "installing tool registry");
        self.registry.replace(registry);
    }

    /// Handles one decoded envelope for `session_id`.
    ///
    /// Returns `None` for successful notifications and for responses sent by
    /// the client; every other outcome produces a response envelope.
    pub async fn handle(&self, session_id: &SessionId, envelope: Value) -> Option<JsonRpcResponse> {
        match ProtocolMessage::parse(envelope) {
            Ok(message) => self.handle_message(session_id, message).await,
            Err(invalid) => {
                debug!(session = %session_id, reason = %invalid, "rejecting invalid envelope");
                let error = ProtocolError::InvalidRequest(invalid.reason);
                Some(JsonRpcResponse::failure(
                    invalid.id,
                    error.to_json_rpc_error(),
                ))
            }
        }
    }

    /// Handles one classified envelope for `session_id`.
    pub async fn handle_message(
        &self,
        session_id: &SessionId,
        message: ProtocolMessage,
    ) -> Option<JsonRpcResponse> {
        match message {
            ProtocolMessage::Request { id, method, params } => {
                Some(match self.dispatch(session_id, &method, params).await {
                    Ok(result) => JsonRpcResponse::success(id, result),
                    Err(error) => JsonRpcResponse::failure(Some(id), error.to_json_rpc_error()),
                })
            }
            ProtocolMessage::Notification { method, params } => self
                .dispatch(session_id, &method, params)
                .await
                .err()
                .map(|error| JsonRpcResponse::failure(None, error.to_json_rpc_error())),
            ProtocolMessage::Response(response) => {
                debug!(session = %session_id, id = ?response.id(), "ignoring client response");
                None
            }
        }
    }

    async fn dispatch(
        &self,
        session_id: &SessionId,
        method: &str,
        params: Option<Value>,
    ) -> Result<Value, ProtocolError> {
        debug!(session = %session_id, method, "dispatching");
        match method {
            "initialize" => return self.initialize(session_id, params).await,
            "ping" => return Ok(json!({})),
            _ => {}
        }

        let Some(mut session) = self.sessions.load(session_id).await? else {
            return Err(ProtocolError::SessionNotInitialized);
        };

        match method {
            "initialized" | "notifications/initialized" => self.activate(&mut session).await,
            _ if !session.is_initialized() => Err(ProtocolError::SessionNotInitialized),
            "tools/list" => list_tools(&session, params),
            "tools/call" => self.call_tool(&session, params).await,
            other => Err(ProtocolError::MethodNotFound(other.to_owned())),
        }
    }

    async fn initialize(
        &self,
        session_id: &SessionId,
        params: Option<Value>,
    ) -> Result<Value, ProtocolError> {
        let fields = params_object(params)?;
        let requested = fields
            .get("protocolVersion")
            .filter(|value| !value.is_null())
            .ok_or(ProtocolError::MissingProtocolVersion)?;
        let version = requested
            .as_str()
            .filter(|candidate| is_supported_version(candidate))
            .ok_or_else(|| ProtocolError::UnsupportedProtocolVersion {
                requested: requested.clone(),
            })?;
        let capabilities = fields
            .get("capabilities")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let session = Session::negotiate(
            session_id.clone(),
            version,
            capabilities,
            self.registry.current(),
            &*self.clock,
        );
        self.sessions.create(&session).await?;
        info!(
            session = %session_id,
            protocol_version = version,
            tools = session.registry().len(),
            "session negotiated"
        );

        Ok(json!({
            "protocolVersion": version,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": {
                "name": self.server_info.name(),
                "version": self.server_info.version(),
            },
        }))
    }

    async fn activate(&self, session: &mut Session) -> Result<Value, ProtocolError> {
        if session.activate() {
            self.sessions.update(session).await?;
            info!(session = %session.id(), "session active");
        } else {
            debug!(session = %session.id(), "session already active");
        }
        Ok(json!({}))
    }

    async fn call_tool(
        &self,
        session: &Session,
        params: Option<Value>,
    ) -> Result<Value, ProtocolError> {
        let fields = params_object(params)?;
        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .filter(|candidate| !candidate.is_empty())
            .ok_or(ProtocolError::MissingToolName)?;
        let tool = session
            .registry()
            .get(name)
            .ok_or_else(|| ProtocolError::ToolNotFound(name.to_owned()))?;
        let arguments = match fields.get("arguments") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(supplied)) => supplied.clone(),
            Some(_) => {
                return Err(ProtocolError::InvalidParams(
                    "arguments must be an object".to_owned(),
                ));
            }
        };

        validate_arguments(tool, &arguments)?;
        let output = self.executor.execute(tool, &arguments).await?;

        Ok(json!({
            "content": [{ "type": "text", "text": output.to_text() }],
            "isError": false,
        }))
    }
}

fn list_tools(session: &Session, params: Option<Value>) -> Result<Value, ProtocolError> {
    let fields = params_object(params)?;
    let offset = match fields.get("cursor") {
        None | Some(Value::Null) => 0,
        Some(Value::String(cursor)) => parse_cursor(cursor)?,
        Some(other) => return Err(ProtocolError::InvalidCursor(other.to_string())),
    };

    let page = session.registry().page(offset, PAGE_SIZE);
    let full_page = page.len() == PAGE_SIZE;
    let tools =
        serde_json::to_value(page).map_err(|err| ProtocolError::Internal(err.to_string()))?;

    let mut result = Map::new();
    result.insert("tools".to_owned(), tools);
    if full_page {
        result.insert(
            "nextCursor".to_owned(),
            Value::String((offset + PAGE_SIZE).to_string()),
        );
    }
    Ok(Value::Object(result))
}

fn parse_cursor(cursor: &str) -> Result<usize, ProtocolError> {
    if cursor.is_empty() || !cursor.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ProtocolError::InvalidCursor(cursor.to_owned()));
    }
    cursor
        .parse()
        .map_err(|_| ProtocolError::InvalidCursor(cursor.to_owned()))
}

fn params_object(params: Option<Value>) -> Result<Map<String, Value>, ProtocolError> {
    match params {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(fields)) => Ok(fields),
        Some(_) => Err(ProtocolError::InvalidParams(
            "params must be an object".to_owned(),
        )),
    }
}
