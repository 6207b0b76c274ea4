//! Step definitions for tool session scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
