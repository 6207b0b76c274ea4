//! Unit tests for the invocation context.
