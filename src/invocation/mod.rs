//! HTTP invocation of compiled tools.
//!
//! A tool call becomes exactly one HTTP request: path tokens are expanded,
//! remaining declared parameters become query pairs, and the synthetic
//! `body` argument becomes the JSON payload. The request is executed
//! through the [`ports::HttpTransport`] port and the response is folded
//! into a [`crate::tool::domain::ToolOutput`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
