//! Unit tests for the HTTP host.
