//! Compiler from OpenAPI descriptions to tool registries.

use super::{ReferenceResolver, references::reference_of};
use crate::tool::domain::{
    BODY_PARAMETER, HttpMethod, ParameterDescriptor, ToolDefinition, ToolDomainError, ToolName,
    ToolOperation, ToolRegistry, path_template_tokens,
};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a single operation is excluded from compilation.
///
/// Compile errors never abort the whole description: the offending
/// operation is logged and skipped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    /// The operation entry is not a JSON object.
    #[error("operation must be an object")]
    OperationNotObject,

    /// A `parameters` entry is not an array.
    #[error("parameters must be an array")]
    ParametersNotArray,

    /// A parameter declaration is not a JSON object.
    #[error("parameter at index {index} must be an object")]
    ParameterNotObject {
        /// Position in the declaring `parameters` array.
        index: usize,
    },

    /// A parameter declaration has no usable `name`.
    #[error("parameter at index {index} has no name")]
    MissingParameterName {
        /// Position in the declaring `parameters` array.
        index: usize,
    },

    /// A parameter declares an `in` value outside path, query, header and
    /// cookie.
    #[error("parameter '{name}' has unsupported location '{location}'")]
    UnsupportedParameterLocation {
        /// Parameter name.
        name: String,
        /// Declared location.
        location: String,
    },

    /// A reference points outside the description document.
    #[error("external reference '{0}' cannot be resolved")]
    ExternalReference(String),

    /// A local reference does not point at an existing node.
    #[error("reference '{0}' does not resolve")]
    DanglingReference(String),

    /// A reference chain is too long or cyclic.
    #[error("reference '{0}' exceeds the maximum resolution depth")]
    ReferenceDepthExceeded(String),

    /// Domain validation of the compiled tool failed.
    #[error(transparent)]
    Domain(#[from] ToolDomainError),
}

/// An operation excluded from the registry and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOperation {
    /// HTTP method of the skipped operation.
    pub method: HttpMethod,
    /// Path template of the skipped operation.
    pub path: String,
    /// Reason for exclusion.
    pub error: CompileError,
}

/// Outcome of compiling one description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compilation {
    /// Tools compiled from well-formed operations.
    pub registry: ToolRegistry,
    /// Operations that were excluded.
    pub skipped: Vec<SkippedOperation>,
}

/// Compiles a description into a registry, discarding skip diagnostics.
///
/// # Examples
///
/// ```
/// use portico::tool::services::generate_tools;
/// use serde_json::json;
///
/// let description = json!({
///     "openapi": "3.0.3",
///     "paths": {
///         "/users/{id}": {
///             "get": { "operationId": "getUserById" }
///         }
///     }
/// });
///
/// let registry = generate_tools(&description);
/// let tool = registry.get("get_user_by_id").expect("tool should compile");
/// assert_eq!(tool.input_schema().required(), ["id".to_owned()]);
/// ```
#[must_use]
pub fn generate_tools(description: &Value) -> ToolRegistry {
    compile_description(description).registry
}

/// Compiles every well-formed operation of `description`.
///
/// Operations are visited in document order. Malformed operations are
/// logged and reported in [`Compilation::skipped`].
#[must_use]
pub fn compile_description(description: &Value) -> Compilation {
    let resolver = ReferenceResolver::new(description);
    let mut compilation = Compilation::default();

    let Some(paths) = description.get("paths").and_then(Value::as_object) else {
        debug!("description declares no paths");
        return compilation;
    };

    for (path, item) in paths {
        let path_item = match resolver.resolve(item) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                warn!(path = %path, "skipping path item that is not an object");
                continue;
            }
            Err(error) => {
                warn!(path = %path, error = %error, "skipping unresolvable path item");
                continue;
            }
        };

        let shared_parameters = path_item.get("parameters");
        for (key, operation) in path_item {
            let Ok(method) = HttpMethod::try_from(key.as_str()) else {
                continue;
            };
            let source = OperationSource {
                path,
                method,
                operation,
                shared_parameters,
            };
            if let Err(error) = compile_into(&resolver, &source, &mut compilation.registry) {
                warn!(
                    method = %method,
                    path = %path,
                    error = %error,
                    "skipping malformed operation"
                );
                compilation.skipped.push(SkippedOperation {
                    method,
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    debug!(
        tools = compilation.registry.len(),
        skipped = compilation.skipped.len(),
        "compiled description"
    );
    compilation
}

struct OperationSource<'doc> {
    path: &'doc str,
    method: HttpMethod,
    operation: &'doc Value,
    shared_parameters: Option<&'doc Value>,
}

struct DeclaredParameter<'doc> {
    name: &'doc str,
    location: &'doc str,
    descriptor: ParameterDescriptor,
}

fn compile_into<'doc>(
    resolver: &ReferenceResolver<'doc>,
    source: &OperationSource<'doc>,
    registry: &mut ToolRegistry,
) -> Result<(), CompileError> {
    let fields = source
        .operation
        .as_object()
        .ok_or(CompileError::OperationNotObject)?;

    let declared =
        declared_parameters(resolver, source.shared_parameters, fields.get("parameters"))?;
    let mut parameters = collect_parameters(source.path, declared);
    if let Some(body) = body_parameter(resolver, fields) {
        parameters.retain(|parameter| parameter.name() != BODY_PARAMETER);
        parameters.push(body);
    }

    let name = unique_name(registry, base_name(fields, source)?);
    let description = describe(fields, source);
    let operation = ToolOperation::new(source.method, source.path, parameters);
    registry.insert(ToolDefinition::new(name, description, operation))?;
    Ok(())
}

fn base_name(
    fields: &Map<String, Value>,
    source: &OperationSource<'_>,
) -> Result<ToolName, CompileError> {
    if let Some(operation_id) = text_field(fields, "operationId")
        && let Ok(name) = ToolName::from_candidate(operation_id)
    {
        return Ok(name);
    }
    let fallback = format!("{}_{}", source.method.token(), source.path);
    ToolName::from_candidate(&fallback).map_err(CompileError::from)
}

fn unique_name(registry: &ToolRegistry, base: ToolName) -> ToolName {
    if !registry.contains(base.as_str()) {
        return base;
    }

    let mut suffix = 2;
    loop {
        let candidate = base.with_suffix(suffix);
        if !registry.contains(candidate.as_str()) {
            warn!(name = %base, renamed = %candidate, "disambiguated colliding tool name");
            return candidate;
        }
        suffix += 1;
    }
}

fn describe(fields: &Map<String, Value>, source: &OperationSource<'_>) -> String {
    text_field(fields, "description")
        .or_else(|| text_field(fields, "summary"))
        .map_or_else(
            || format!("{} {}", source.method.as_str(), source.path),
            str::to_owned,
        )
}

fn text_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

/// Merges path-item and operation parameters; an operation parameter with
/// the same `name` and `in` replaces the path-item one in place.
fn declared_parameters<'doc>(
    resolver: &ReferenceResolver<'doc>,
    shared: Option<&'doc Value>,
    own: Option<&'doc Value>,
) -> Result<Vec<DeclaredParameter<'doc>>, CompileError> {
    let mut declared: Vec<DeclaredParameter<'doc>> = Vec::new();
    for list in [shared, own].into_iter().flatten() {
        let entries = list.as_array().ok_or(CompileError::ParametersNotArray)?;
        for (index, entry) in entries.iter().enumerate() {
            let Some(parameter) = declared_parameter(resolver, entry, index)? else {
                continue;
            };
            if let Some(slot) = declared.iter_mut().find(|existing| {
                existing.name == parameter.name && existing.location == parameter.location
            }) {
                *slot = parameter;
                continue;
            }
            declared.push(parameter);
        }
    }
    Ok(declared)
}

fn declared_parameter<'doc>(
    resolver: &ReferenceResolver<'doc>,
    entry: &'doc Value,
    index: usize,
) -> Result<Option<DeclaredParameter<'doc>>, CompileError> {
    let resolved = match resolver.resolve(entry) {
        Ok(resolved) => resolved,
        Err(error) => {
            warn!(index, error = %error, "dropping unresolvable parameter reference");
            return Ok(None);
        }
    };

    let fields = resolved
        .as_object()
        .ok_or(CompileError::ParameterNotObject { index })?;
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .filter(|candidate| !candidate.trim().is_empty())
        .ok_or(CompileError::MissingParameterName { index })?;
    let location = fields.get("in").and_then(Value::as_str).unwrap_or("query");
    if !matches!(location, "path" | "query" | "header" | "cookie") {
        return Err(CompileError::UnsupportedParameterLocation {
            name: name.to_owned(),
            location: location.to_owned(),
        });
    }

    let required = fields
        .get("required")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let schema = fields
        .get("schema")
        .map_or_else(|| json!({}), |declared| resolve_schema(resolver, declared));
    let mut descriptor = ParameterDescriptor::new(name, required, schema);
    if let Some(description) = fields.get("description").and_then(Value::as_str) {
        descriptor = descriptor.with_description(description);
    }

    Ok(Some(DeclaredParameter {
        name,
        location,
        descriptor,
    }))
}

/// Orders parameters: path tokens first (overridable by a declared
/// parameter of the same name), then the remaining declared parameters.
fn collect_parameters(
    path: &str,
    declared: Vec<DeclaredParameter<'_>>,
) -> Vec<ParameterDescriptor> {
    let mut pending: Vec<Option<DeclaredParameter<'_>>> =
        declared.into_iter().map(Some).collect();
    let mut parameters = Vec::with_capacity(pending.len());

    for token in path_template_tokens(path) {
        let overridden = take_token_override(&mut pending, token, "path")
            .or_else(|| take_token_override(&mut pending, token, "query"));
        parameters.push(overridden.map_or_else(
            || ParameterDescriptor::path_token(token),
            |parameter| parameter.descriptor,
        ));
    }

    for parameter in pending.into_iter().flatten() {
        if matches!(parameter.location, "header" | "cookie") {
            debug!(
                name = parameter.name,
                location = parameter.location,
                "omitting parameter that cannot be sent as a query pair"
            );
            continue;
        }
        if parameters.iter().any(|existing| existing.name() == parameter.name) {
            warn!(name = parameter.name, "omitting duplicate parameter name");
            continue;
        }
        parameters.push(parameter.descriptor);
    }

    parameters
}

/// Takes the first pending declaration named `token` at `location`.
///
/// Header and cookie parameters never replace a path token.
fn take_token_override<'doc>(
    pending: &mut [Option<DeclaredParameter<'doc>>],
    token: &str,
    location: &str,
) -> Option<DeclaredParameter<'doc>> {
    pending
        .iter_mut()
        .find(|slot| {
            slot.as_ref()
                .is_some_and(|parameter| parameter.name == token && parameter.location == location)
        })
        .and_then(Option::take)
}

fn body_parameter<'doc>(
    resolver: &ReferenceResolver<'doc>,
    fields: &'doc Map<String, Value>,
) -> Option<ParameterDescriptor> {
    let declared = fields.get("requestBody")?;
    let request_body = match resolver.resolve(declared) {
        Ok(resolved) => resolved,
        Err(error) => {
            warn!(error = %error, "dropping unresolvable request body reference");
            return None;
        }
    };

    let content = request_body.get("content").and_then(Value::as_object)?;
    let media = content.get("application/json").or_else(|| {
        content
            .iter()
            .find(|(media_type, _)| media_type.starts_with("application/json"))
            .map(|(_, entry)| entry)
    })?;
    let schema = media.get("schema")?;

    let required = request_body
        .get("required")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let mut descriptor =
        ParameterDescriptor::new(BODY_PARAMETER, required, resolve_schema(resolver, schema));
    if let Some(description) = request_body.get("description").and_then(Value::as_str) {
        descriptor = descriptor.with_description(description);
    }
    Some(descriptor)
}

/// Resolves a schema's top-level reference; unresolvable schemas are kept
/// verbatim and validate as `unresolved`.
fn resolve_schema<'doc>(resolver: &ReferenceResolver<'doc>, schema: &'doc Value) -> Value {
    resolver.resolve(schema).map_or_else(
        |error| {
            debug!(
                reference = reference_of(schema).unwrap_or_default(),
                error = %error,
                "keeping unresolved schema"
            );
            schema.clone()
        },
        Value::clone,
    )
}
