//! Loading of the source API description.
//!
//! A description is located by a path or an `http(s)` URL and decoded into
//! a JSON document ready for compilation.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
