//! Adapter implementations for the transport port.

pub mod http;
pub mod memory;

pub use http::ReqwestTransport;
pub use memory::RecordingHttpTransport;
