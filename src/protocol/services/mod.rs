//! Argument validation and envelope dispatch.

mod arguments;
mod error;
mod router;

pub use arguments::validate_arguments;
pub use error::ProtocolError;
pub use router::{PAGE_SIZE, ProtocolRouter, ServerInfo};
