//! Portico: REST API descriptions as callable tools.
//!
//! This crate compiles an OpenAPI 3 JSON document into tool definitions and
//! serves them over a JSON-RPC tool-calling protocol, translating each tool
//! call into one HTTP request against the described API.
//!
//! # Architecture
//!
//! Portico follows hexagonal architecture principles:
//!
//! - **Domain**: Pure data and rules with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (HTTP, files, memory)
//!
//! # Modules
//!
//! - [`tool`]: Description compilation and the tool registry
//! - [`protocol`]: Envelopes, sessions and method routing
//! - [`invocation`]: Request building and upstream execution
//! - [`description`]: Loading description documents
//! - [`server`]: The axum host

pub mod description;
pub mod invocation;
pub mod protocol;
pub mod server;
pub mod tool;
