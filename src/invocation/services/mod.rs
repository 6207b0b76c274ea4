//! Services turning tool calls into HTTP exchanges.

mod error;
mod invoker;

pub use error::InvocationError;
pub use invoker::{ToolInvoker, decode_response};
