//! Compilation of REST API descriptions into callable tool definitions.
//!
//! The tool context turns an OpenAPI document into an immutable registry of
//! tools, each carrying a JSON-Schema-shaped input contract and the HTTP
//! operation it is bound to. Compilation is pure: no I/O and no shared
//! state. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - The compiler and reference resolution in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
