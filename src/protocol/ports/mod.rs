//! Port contracts for session persistence and tool execution.

mod executor;
mod session_store;

pub use executor::{ToolExecutionError, ToolExecutor};
#[cfg(test)]
pub use executor::MockToolExecutor;
pub use session_store::{SessionStore, SessionStoreError, SessionStoreResult};
