//! Adapter implementations for protocol ports.

pub mod memory;
