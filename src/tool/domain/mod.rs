//! Domain model for compiled tools.
//!
//! A tool couples a validated name and description with the HTTP operation
//! it invokes. Input schemas are derived from the operation's parameters so
//! the `required ⊆ properties` invariant holds by construction.

mod definition;
mod error;
mod name;
mod output;
mod registry;
mod schema;

pub use definition::{
    BODY_PARAMETER, HttpMethod, ParameterDescriptor, ToolDefinition, ToolOperation,
    path_template_tokens,
};
pub use error::{ParseHttpMethodError, ToolDomainError};
pub use name::{ToolName, normalize_tool_name};
pub use output::ToolOutput;
pub use registry::{SharedToolRegistry, ToolRegistry};
pub use schema::{InputSchema, SchemaKind};
