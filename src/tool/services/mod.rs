//! Compilation services for the tool context.

mod compiler;
mod references;

pub use compiler::{
    Compilation, CompileError, SkippedOperation, compile_description, generate_tools,
};
pub use references::ReferenceResolver;
