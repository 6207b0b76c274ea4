//! Unit tests for the protocol context.

mod router_tests;
