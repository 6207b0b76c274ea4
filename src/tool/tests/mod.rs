//! Unit tests for tool compilation.
