//! Resolution of local `$ref` pointers against the source description.

use super::CompileError;
use serde_json::Value;

/// Maximum number of chained references followed before giving up.
const MAX_REFERENCE_DEPTH: usize = 16;

/// Resolves `#/...` references inside one description document.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'doc> {
    document: &'doc Value,
}

impl<'doc> ReferenceResolver<'doc> {
    /// Creates a resolver over `document`.
    #[must_use]
    pub const fn new(document: &'doc Value) -> Self {
        Self { document }
    }

    /// Follows `value`'s `$ref` chain until a non-reference node is reached.
    ///
    /// Values without a `$ref` are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::ExternalReference`] for references outside the
    /// document, [`CompileError::DanglingReference`] when the pointer does not
    /// resolve, and [`CompileError::ReferenceDepthExceeded`] for cycles.
    pub fn resolve(&self, value: &'doc Value) -> Result<&'doc Value, CompileError> {
        let mut current = value;
        for _ in 0..MAX_REFERENCE_DEPTH {
            let Some(reference) = reference_of(current) else {
                return Ok(current);
            };
            current = self.lookup(reference)?;
        }

        reference_of(current).map_or(Ok(current), |reference| {
            Err(CompileError::ReferenceDepthExceeded(reference.to_owned()))
        })
    }

    fn lookup(&self, reference: &str) -> Result<&'doc Value, CompileError> {
        let Some(fragment) = reference.strip_prefix('#') else {
            return Err(CompileError::ExternalReference(reference.to_owned()));
        };
        let pointer = urlencoding::decode(fragment)
            .map_err(|_| CompileError::DanglingReference(reference.to_owned()))?;
        self.document
            .pointer(&pointer)
            .ok_or_else(|| CompileError::DanglingReference(reference.to_owned()))
    }
}

/// Returns the `$ref` target of a reference object.
#[must_use]
pub fn reference_of(value: &Value) -> Option<&str> {
    value.get("$ref").and_then(Value::as_str)
}
