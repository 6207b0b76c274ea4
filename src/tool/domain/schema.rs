//! Input schemas and the closed set of schema kinds used for argument checks.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;

/// Schema kinds understood by the shallow argument validator.
///
/// Each kind owns exactly one check. Schemas without a recognised `type`
/// are [`SchemaKind::Unresolved`] and accept any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// JSON string.
    String,
    /// Any JSON number.
    Number,
    /// JSON number without a fractional part.
    Integer,
    /// JSON boolean.
    Boolean,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
    /// Missing, unknown, or unresolved type.
    Unresolved,
}

impl SchemaKind {
    /// Classifies a schema fragment by its declared `type`.
    ///
    /// When `type` is an array (as in `["string", "null"]`) the first
    /// non-null entry is used.
    #[must_use]
    pub fn of(schema: &Value) -> Self {
        let declared = match schema.get("type") {
            Some(Value::String(kind)) => Some(kind.as_str()),
            Some(Value::Array(kinds)) => kinds
                .iter()
                .filter_map(Value::as_str)
                .find(|kind| *kind != "null"),
            _ => None,
        };

        match declared {
            Some("string") => Self::String,
            Some("number") => Self::Number,
            Some("integer") => Self::Integer,
            Some("boolean") => Self::Boolean,
            Some("object") => Self::Object,
            Some("array") => Self::Array,
            _ => Self::Unresolved,
        }
    }

    /// Returns whether `value` passes this kind's shallow check.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => is_integral(value),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Unresolved => true,
        }
    }

    /// Returns the canonical JSON-Schema type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Unresolved => "unresolved",
        }
    }

    /// Names the JSON type of a supplied value for diagnostics.
    #[must_use]
    pub const fn describe_value(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => true,
        Value::Number(number) => number.as_f64().is_some_and(|float| float.fract() == 0.0),
        _ => false,
    }
}

/// Object schema describing a tool's accepted arguments.
///
/// Serializes as `{"type": "object", "properties": {...}, "required": [...]}`.
/// Required names are always a subset of the property names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSchema {
    properties: IndexMap<String, Value>,
    required: Vec<String>,
}

impl InputSchema {
    /// Creates an empty object schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a property.
    ///
    /// Replacing a property also replaces its required flag.
    pub fn insert_property(&mut self, name: impl Into<String>, schema: Value, required: bool) {
        let property_name = name.into();
        self.required.retain(|existing| *existing != property_name);
        if required {
            self.required.push(property_name.clone());
        }
        self.properties.insert(property_name, schema);
    }

    /// Returns property schemas in declaration order.
    #[must_use]
    pub const fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    /// Returns the schema of one property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Returns the required property names in declaration order.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Returns whether a property is required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|required| required == name)
    }
}

impl Serialize for InputSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "object")?;
        map.serialize_entry("properties", &self.properties)?;
        map.serialize_entry("required", &self.required)?;
        map.end()
    }
}
