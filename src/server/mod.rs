//! HTTP host exposing the protocol router.
//!
//! `POST /mcp` carries one JSON-RPC envelope per request and correlates
//! sessions through the `mcp-session-id` header. The tool registry is
//! compiled from the configured description on first use and recompiled
//! whenever the refresh interval has elapsed.

mod catalog;
mod config;
mod http;

pub use catalog::ToolCatalog;
pub use config::{DEFAULT_BIND, ServerConfig, ServerConfigError};
pub use http::{HostOutcome, McpHost, SESSION_HEADER, app, serve};

#[cfg(test)]
mod tests;
