//! Tool definitions and the HTTP operations they are bound to.

use super::{InputSchema, ParseHttpMethodError, SchemaKind, ToolName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Name of the synthetic parameter carrying a JSON request body.
pub const BODY_PARAMETER: &str = "body";

/// HTTP methods an operation may be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
    /// `TRACE`
    Trace,
}

impl HttpMethod {
    /// Returns the upper-case wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }

    /// Returns the lower-case token used as an OpenAPI path-item key.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HttpMethod {
    type Error = ParseHttpMethodError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "get" => Ok(Self::Get),
            "put" => Ok(Self::Put),
            "post" => Ok(Self::Post),
            "delete" => Ok(Self::Delete),
            "options" => Ok(Self::Options),
            "head" => Ok(Self::Head),
            "patch" => Ok(Self::Patch),
            "trace" => Ok(Self::Trace),
            _ => Err(ParseHttpMethodError(value.to_owned())),
        }
    }
}

/// Extracts the `{token}` names of a path template in order of appearance.
///
/// Empty braces are ignored and repeated tokens are reported once.
///
/// # Examples
///
/// ```
/// use portico::tool::domain::path_template_tokens;
///
/// assert_eq!(
///     path_template_tokens("/orgs/{org}/repos/{repo}"),
///     vec!["org", "repo"],
/// );
/// ```
#[must_use]
pub fn path_template_tokens(template: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    for segment in template.split('{').skip(1) {
        if let Some((token, _)) = segment.split_once('}')
            && !token.is_empty()
            && !tokens.contains(&token)
        {
            tokens.push(token);
        }
    }
    tokens
}

/// One input accepted by an operation.
///
/// Whether the parameter travels in the path, the query string, or the body
/// is inferred from the operation: path-template tokens are path parameters,
/// [`BODY_PARAMETER`] is the payload, and everything else is a query
/// parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    name: String,
    description: Option<String>,
    required: bool,
    schema: Value,
}

impl ParameterDescriptor {
    /// Creates a parameter descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, required: bool, schema: Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            required,
            schema,
        }
    }

    /// Creates the implicit string parameter for a path-template token.
    #[must_use]
    pub fn path_token(name: impl Into<String>) -> Self {
        Self::new(name, true, serde_json::json!({ "type": "string" }))
    }

    /// Sets a human-readable description. Blank descriptions are ignored.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let text = description.into().trim().to_owned();
        self.description = (!text.is_empty()).then_some(text);
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the parameter must be supplied.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the schema fragment.
    #[must_use]
    pub const fn schema(&self) -> &Value {
        &self.schema
    }

    /// Returns the kind used for shallow argument checks.
    #[must_use]
    pub fn kind(&self) -> SchemaKind {
        SchemaKind::of(&self.schema)
    }

    /// Returns the schema published for this parameter, carrying the
    /// description when the fragment lacks one.
    fn property_schema(&self) -> Value {
        let mut schema = self.schema.clone();
        if let (Some(description), Value::Object(fields)) = (&self.description, &mut schema)
            && !fields.contains_key("description")
        {
            fields.insert(
                "description".to_owned(),
                Value::String(description.clone()),
            );
        }
        schema
    }
}

/// The HTTP operation a tool invokes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOperation {
    method: HttpMethod,
    path: String,
    parameters: Vec<ParameterDescriptor>,
}

impl ToolOperation {
    /// Creates an operation binding.
    #[must_use]
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            parameters,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns parameters in collection order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Returns the path-template tokens.
    #[must_use]
    pub fn path_tokens(&self) -> Vec<&str> {
        path_template_tokens(&self.path)
    }

    /// Returns whether the operation accepts a JSON body.
    #[must_use]
    pub fn accepts_body(&self) -> bool {
        self.parameters
            .iter()
            .any(|parameter| parameter.name() == BODY_PARAMETER)
    }

    /// Returns the parameters sent in the query string.
    #[must_use]
    pub fn query_parameters(&self) -> Vec<&ParameterDescriptor> {
        let tokens = self.path_tokens();
        self.parameters
            .iter()
            .filter(|parameter| {
                parameter.name() != BODY_PARAMETER && !tokens.contains(&parameter.name())
            })
            .collect()
    }
}

/// A compiled, immutable tool.
///
/// Serializes to the `tools/list` wire shape: `name`, `description` and
/// `inputSchema`. The bound operation stays server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    name: ToolName,
    description: String,
    input_schema: InputSchema,
    #[serde(skip)]
    operation: ToolOperation,
}

impl ToolDefinition {
    /// Creates a tool and derives its input schema from the operation's
    /// parameters.
    #[must_use]
    pub fn new(name: ToolName, description: impl Into<String>, operation: ToolOperation) -> Self {
        let mut input_schema = InputSchema::new();
        for parameter in operation.parameters() {
            input_schema.insert_property(
                parameter.name(),
                parameter.property_schema(),
                parameter.is_required(),
            );
        }

        Self {
            name,
            description: description.into(),
            input_schema,
            operation,
        }
    }

    /// Returns the tool name.
    #[must_use]
    pub const fn name(&self) -> &ToolName {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the input schema.
    #[must_use]
    pub const fn input_schema(&self) -> &InputSchema {
        &self.input_schema
    }

    /// Returns the bound HTTP operation.
    #[must_use]
    pub const fn operation(&self) -> &ToolOperation {
        &self.operation
    }

    /// Returns the declared parameter with the given name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.operation
            .parameters()
            .iter()
            .find(|parameter| parameter.name() == name)
    }
}
