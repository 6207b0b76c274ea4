//! Unit tests for the description context.
