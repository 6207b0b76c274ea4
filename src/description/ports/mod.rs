//! Port contract for reading description documents.

mod loader;

pub use loader::{DescriptionLoadError, DescriptionLoadResult, DescriptionLoader, decode_document};
