//! Shared helpers for in-memory integration tests.

use eyre::{OptionExt, ensure};
use mockable::DefaultClock;
use portico::invocation::{
    adapters::RecordingHttpTransport, domain::InvokerConfig, services::ToolInvoker,
};
use portico::protocol::{
    adapters::memory::InMemorySessionStore,
    domain::{JsonRpcResponse, SessionId},
    services::ProtocolRouter,
};
use portico::tool::services::generate_tools;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Router wired to a scripted upstream.
pub type TestRouter =
    ProtocolRouter<InMemorySessionStore, ToolInvoker<RecordingHttpTransport>, DefaultClock>;

/// A router together with the transport it calls through.
pub struct Bridge {
    /// The router under test.
    pub router: TestRouter,
    /// The scripted upstream.
    pub transport: Arc<RecordingHttpTransport>,
}

/// Compiles `description` and wires it to a scripted upstream at
/// `https://api.example.com`.
///
/// # Errors
///
/// Returns an error if the invoker configuration is rejected.
pub fn bridge(description: &Value) -> eyre::Result<Bridge> {
    let transport = Arc::new(RecordingHttpTransport::new());
    let invoker = ToolInvoker::new(
        Arc::new(InvokerConfig::new("https://api.example.com")?),
        Arc::clone(&transport),
    );
    let router = ProtocolRouter::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(invoker),
        Arc::new(DefaultClock),
        generate_tools(description),
    );
    Ok(Bridge { router, transport })
}

/// Builds a request envelope.
#[must_use]
pub fn request(id: i64, method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
}

/// A description with `count` parameterless `GET` operations.
#[must_use]
pub fn synthetic_description(count: usize) -> Value {
    let paths: Map<String, Value> = (0..count)
        .map(|index| {
            (
                format!("/items{index:03}"),
                json!({"get": {"operationId": format!("item{index:03}")}}),
            )
        })
        .collect();
    json!({"openapi": "3.0.3", "paths": paths})
}

/// Sends `envelope` and returns the result payload of a successful response.
///
/// # Errors
///
/// Returns an error if no response arrives or it carries an error.
pub async fn call_ok(router: &TestRouter, session: &SessionId, envelope: Value) -> eyre::Result<Value> {
    let response = router
        .handle(session, envelope)
        .await
        .ok_or_eyre("expected a response")?;
    response
        .result()
        .cloned()
        .ok_or_else(|| eyre::eyre!("expected success, got {:?}", response.error()))
}

/// Sends `envelope` and returns the error code of the response.
///
/// # Errors
///
/// Returns an error if no response arrives or it succeeded.
pub async fn call_err(router: &TestRouter, session: &SessionId, envelope: Value) -> eyre::Result<(i32, JsonRpcResponse)> {
    let response = router
        .handle(session, envelope)
        .await
        .ok_or_eyre("expected a response")?;
    let code = response
        .error()
        .map(portico::protocol::domain::JsonRpcError::code)
        .ok_or_eyre("expected an error response")?;
    Ok((code, response))
}

/// Negotiates and activates `session`.
///
/// # Errors
///
/// Returns an error if either step does not behave as expected.
pub async fn activate(router: &TestRouter, session: &SessionId) -> eyre::Result<()> {
    call_ok(
        router,
        session,
        request(0, "initialize", json!({"protocolVersion": "2025-06-18"})),
    )
    .await?;
    let acknowledged = router
        .handle(
            session,
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .await;
    ensure!(acknowledged.is_none(), "initialized notification must not be answered");
    Ok(())
}
