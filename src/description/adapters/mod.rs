//! Adapter implementations for the description loader port.

pub mod file;
pub mod http;
pub mod location;
pub mod memory;

pub use file::FileDescriptionLoader;
pub use http::HttpDescriptionLoader;
pub use location::LocationDescriptionLoader;
pub use memory::InMemoryDescriptionLoader;
