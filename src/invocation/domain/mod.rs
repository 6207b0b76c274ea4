//! Request building, invoker configuration and response values.

mod config;
mod error;
mod request;
mod response;

pub use config::{ConfigError, InvokerConfig, parse_header_spec};
pub use error::RequestBuildError;
pub use request::{ACCEPT, PreparedRequest, prepare_request};
pub use response::{HttpResponse, MAX_ERROR_BODY_CHARS};
