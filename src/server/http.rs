//! axum routes for the protocol endpoint.

use super::ToolCatalog;
use crate::description::ports::DescriptionLoader;
use crate::protocol::{
    domain::{JsonRpcResponse, SessionId},
    ports::{SessionStore, ToolExecutor},
    services::{ProtocolError, ProtocolRouter},
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Header correlating requests with a protocol session.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// What the endpoint answers for one request body.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOutcome {
    /// A routed response, sent with `200 OK`.
    Reply(JsonRpcResponse),
    /// A handled notification, sent as `202 Accepted` with no body.
    Accepted,
    /// A parse or load failure, sent with `500 Internal Server Error`.
    Failure(JsonRpcResponse),
}

impl IntoResponse for HostOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Reply(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
            Self::Failure(envelope) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
            }
        }
    }
}

/// The protocol router paired with the catalog feeding its registry.
pub struct McpHost<S, E, C, L>
where
    S: SessionStore,
    E: ToolExecutor,
    C: Clock + Send + Sync,
    L: DescriptionLoader,
{
    router: ProtocolRouter<S, E, C>,
    catalog: ToolCatalog<L>,
}

impl<S, E, C, L> McpHost<S, E, C, L>
where
    S: SessionStore,
    E: ToolExecutor,
    C: Clock + Send + Sync,
    L: DescriptionLoader,
{
    /// Creates a host.
    #[must_use]
    pub const fn new(router: ProtocolRouter<S, E, C>, catalog: ToolCatalog<L>) -> Self {
        Self { router, catalog }
    }

    /// Returns the protocol router.
    #[must_use]
    pub const fn router(&self) -> &ProtocolRouter<S, E, C> {
        &self.router
    }

    /// Returns the registry catalog.
    #[must_use]
    pub const fn catalog(&self) -> &ToolCatalog<L> {
        &self.catalog
    }

    /// Decodes, routes and classifies one request body.
    pub async fn handle_body(&self, session_id: &SessionId, body: &[u8]) -> HostOutcome {
        let envelope = match serde_json::from_slice::<Value>(body) {
            Ok(envelope) => envelope,
            Err(err) => return parse_failure(&format!("invalid JSON body: {err}")),
        };

        match self.catalog.refresh_if_due().await {
            Ok(Some(registry)) => self.router.replace_registry(registry),
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "description load failed");
                return parse_failure(&err.to_string());
            }
        }

        self.router
            .handle(session_id, envelope)
            .await
            .map_or(HostOutcome::Accepted, HostOutcome::Reply)
    }
}

fn parse_failure(message: &str) -> HostOutcome {
    let error = ProtocolError::Parse(message.to_owned());
    HostOutcome::Failure(JsonRpcResponse::failure(None, error.to_json_rpc_error()))
}

/// Builds the axum application serving `host`.
pub fn app<S, E, C, L>(host: Arc<McpHost<S, E, C, L>>) -> Router
where
    S: SessionStore + 'static,
    E: ToolExecutor + 'static,
    C: Clock + Send + Sync + 'static,
    L: DescriptionLoader + 'static,
{
    Router::new()
        .route("/mcp", post(mcp_endpoint::<S, E, C, L>))
        .route("/health", get(health))
        .with_state(host)
        .layer(TraceLayer::new_for_http())
}

async fn mcp_endpoint<S, E, C, L>(
    State(host): State<Arc<McpHost<S, E, C, L>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    S: SessionStore,
    E: ToolExecutor,
    C: Clock + Send + Sync,
    L: DescriptionLoader,
{
    let session_id = SessionId::from_header(
        headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok()),
    );
    let mut response = host.handle_body(&session_id, &body).await.into_response();
    if let Ok(echoed) = HeaderValue::from_str(session_id.as_str()) {
        response.headers_mut().insert(SESSION_HEADER, echoed);
    }
    response
}

async fn health() -> &'static str {
    "ok"
}

/// Serves `app` on `listener` until Ctrl-C is received.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    let address = listener.local_addr()?;
    info!(%address, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "failed to listen for shutdown signal");
            }
            info!("shutting down");
        })
        .await
}
