//! Shallow validation of `tools/call` arguments against a tool's schema.

use crate::protocol::domain::ArgumentError;
use crate::tool::domain::{SchemaKind, ToolDefinition};
use serde_json::{Map, Value};

/// Checks `arguments` against `tool`'s input schema.
///
/// Checks run in three passes: every required name is present, every
/// supplied name is declared, and every supplied value passes its schema
/// kind's check. A `null` value for an optional argument counts as absent.
///
/// # Errors
///
/// Returns the first [`ArgumentError`] found.
pub fn validate_arguments(
    tool: &ToolDefinition,
    arguments: &Map<String, Value>,
) -> Result<(), ArgumentError> {
    let schema = tool.input_schema();

    if let Some(missing) = schema
        .required()
        .iter()
        .find(|name| !arguments.contains_key(name.as_str()))
    {
        return Err(ArgumentError::MissingRequired(missing.clone()));
    }

    if let Some(unknown) = arguments.keys().find(|name| tool.parameter(name).is_none()) {
        return Err(ArgumentError::Unknown(unknown.clone()));
    }

    for (name, value) in arguments {
        let Some(parameter) = tool.parameter(name) else {
            continue;
        };
        if value.is_null() && !parameter.is_required() {
            continue;
        }
        let kind = parameter.kind();
        if !kind.accepts(value) {
            return Err(ArgumentError::InvalidType {
                name: name.clone(),
                expected: kind,
                actual: SchemaKind::describe_value(value),
            });
        }
    }

    Ok(())
}
