//! Validated tool names and the normalization that produces them.

use super::ToolDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalizes a candidate string into a lowercase, underscore-separated
/// identifier.
///
/// Characters outside `[A-Za-z0-9_]` become underscores, an underscore is
/// inserted before every upper-case ASCII letter, runs of underscores
/// collapse to one, and a single leading underscore is removed. The result
/// is syntactically valid but may be empty and is not guaranteed to be
/// unique.
///
/// # Examples
///
/// ```
/// use portico::tool::domain::normalize_tool_name;
///
/// assert_eq!(normalize_tool_name("getUserById"), "get_user_by_id");
/// assert_eq!(normalize_tool_name("get_/users/{id}"), "get_users_id_");
/// ```
#[must_use]
pub fn normalize_tool_name(candidate: &str) -> String {
    let mut separated = String::with_capacity(candidate.len() + 8);
    for character in candidate.chars() {
        if character.is_ascii_uppercase() {
            separated.push('_');
            separated.push(character.to_ascii_lowercase());
        } else if character.is_ascii_alphanumeric() || character == '_' {
            separated.push(character);
        } else {
            separated.push('_');
        }
    }

    let mut collapsed = String::with_capacity(separated.len());
    let mut previous_was_underscore = false;
    for character in separated.chars() {
        let is_underscore = character == '_';
        if !(is_underscore && previous_was_underscore) {
            collapsed.push(character);
        }
        previous_was_underscore = is_underscore;
    }

    if collapsed.starts_with('_') {
        collapsed.remove(0);
    }
    collapsed
}

/// Identifier-safe tool name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a validated tool name.
    ///
    /// Only characters in `[a-z0-9_]` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ToolDomainError`] when the name is empty or contains other
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ToolDomainError> {
        let name = value.into();
        if name.is_empty() {
            return Err(ToolDomainError::EmptyToolName);
        }

        let is_valid = name.chars().all(|character| {
            character.is_ascii_lowercase() || character.is_ascii_digit() || character == '_'
        });
        if !is_valid {
            return Err(ToolDomainError::InvalidToolName(name));
        }

        Ok(Self(name))
    }

    /// Normalizes a raw candidate and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ToolDomainError::EmptyToolName`] when nothing remains after
    /// normalization.
    pub fn from_candidate(candidate: &str) -> Result<Self, ToolDomainError> {
        Self::new(normalize_tool_name(candidate))
    }

    /// Returns this name disambiguated with a numeric suffix.
    #[must_use]
    pub fn with_suffix(&self, suffix: usize) -> Self {
        Self(format!("{}_{suffix}", self.0.trim_end_matches('_')))
    }

    /// Returns the tool name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
