//! Port contracts for executing HTTP requests.

mod transport;

pub use transport::{HttpTransport, HttpTransportError, HttpTransportResult};
