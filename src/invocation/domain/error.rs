//! Errors raised while turning a tool call into an HTTP request.

use thiserror::Error;

/// Reasons a tool call cannot be turned into a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestBuildError {
    /// A path-template token has no argument value.
    #[error("missing required path parameter: {0}")]
    MissingPathParameter(String),

    /// The expanded URL is not a valid absolute URL.
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },
}
