//! Shared world state for tool session BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use portico::invocation::{
    adapters::RecordingHttpTransport, domain::InvokerConfig, services::ToolInvoker,
};
use portico::protocol::{
    adapters::memory::InMemorySessionStore, domain::JsonRpcResponse, services::ProtocolRouter,
};
use portico::tool::services::generate_tools;
use rstest::fixture;
use serde_json::Value;

/// Router type used by the BDD world.
pub type TestRouter =
    ProtocolRouter<InMemorySessionStore, ToolInvoker<RecordingHttpTransport>, DefaultClock>;

/// Scenario world for tool session behaviour tests.
pub struct ToolSessionWorld {
    pub transport: Arc<RecordingHttpTransport>,
    pub router: Option<TestRouter>,
    pub last_response: Option<JsonRpcResponse>,
    pub next_id: i64,
}

impl ToolSessionWorld {
    /// Creates a world with no compiled description yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transport: Arc::new(RecordingHttpTransport::new()),
            router: None,
            last_response: None,
            next_id: 1,
        }
    }

    /// Compiles `description` into the router under test.
    pub fn compile(&mut self, description: &Value) -> Result<(), eyre::Report> {
        let invoker = ToolInvoker::new(
            Arc::new(InvokerConfig::new("https://api.example.com")?),
            Arc::clone(&self.transport),
        );
        self.router = Some(ProtocolRouter::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(invoker),
            Arc::new(DefaultClock),
            generate_tools(description),
        ));
        Ok(())
    }

    /// Returns the router or fails when no description was compiled.
    pub fn router(&self) -> Result<&TestRouter, eyre::Report> {
        self.router
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing compiled description in scenario world"))
    }

    /// Allocates the next request identifier.
    pub fn take_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Returns the result payload of the last response.
    pub fn last_result(&self) -> Result<&Value, eyre::Report> {
        let response = self
            .last_response
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing response in scenario world"))?;
        response
            .result()
            .ok_or_else(|| eyre::eyre!("expected a result, got {:?}", response.error()))
    }
}

impl Default for ToolSessionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ToolSessionWorld {
    ToolSessionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
