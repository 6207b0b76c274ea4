//! JSON-RPC session and dispatch layer for tool-calling clients.
//!
//! Each client session moves through `Start -> Negotiating -> Active`.
//! Only `initialize` and `ping` are served before a session is active;
//! `tools/list` and `tools/call` answer from the session's registry
//! snapshot. The module follows hexagonal architecture:
//!
//! - Envelopes, sessions and the error taxonomy in [`domain`]
//! - Session storage and tool execution contracts in [`ports`]
//! - In-memory session storage in [`adapters`]
//! - Argument validation and the router in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
