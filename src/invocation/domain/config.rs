//! Target API configuration shared by every tool call.

use reqwest::Url;
use reqwest::header::{HeaderName, HeaderValue};
use secrecy::SecretString;
use thiserror::Error;

/// Errors raised while validating invoker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base URL does not parse as an absolute URL.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The base URL uses a scheme other than `http` or `https`.
    #[error("unsupported base URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    /// A header specification lacks the `Name: value` separator.
    #[error("invalid header specification '{0}' (expected 'Name: value')")]
    InvalidHeaderSpec(String),

    /// A header name is not a valid HTTP token.
    #[error("invalid header name '{0}'")]
    InvalidHeaderName(String),

    /// A header value contains characters not allowed in HTTP headers.
    #[error("invalid value for header '{0}'")]
    InvalidHeaderValue(String),
}

/// Splits a `Name: value` header specification.
///
/// Both parts are trimmed; the value may itself contain colons.
///
/// # Examples
///
/// ```
/// use portico::invocation::domain::parse_header_spec;
///
/// let (name, value) = parse_header_spec("X-Tenant: acme:eu").expect("valid spec");
/// assert_eq!(name, "X-Tenant");
/// assert_eq!(value, "acme:eu");
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::InvalidHeaderSpec`] when there is no colon or the
/// name is empty.
pub fn parse_header_spec(spec: &str) -> Result<(String, String), ConfigError> {
    let (name, value) = spec
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidHeaderSpec(spec.to_owned()))?;
    let trimmed_name = name.trim();
    if trimmed_name.is_empty() {
        return Err(ConfigError::InvalidHeaderSpec(spec.to_owned()));
    }
    Ok((trimmed_name.to_owned(), value.trim().to_owned()))
}

/// Base URL, static headers and credential applied to every request.
#[derive(Debug)]
pub struct InvokerConfig {
    base_url: String,
    headers: Vec<(String, String)>,
    api_key: Option<SecretString>,
}

impl InvokerConfig {
    /// Creates a configuration for the API rooted at `base_url`.
    ///
    /// Trailing slashes are removed so path templates can be appended
    /// directly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is not an absolute `http` or
    /// `https` URL, or when it has a query or fragment.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_owned()));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "base URL must not carry a query or fragment".to_owned(),
            });
        }

        Ok(Self {
            base_url: trimmed.to_owned(),
            headers: Vec::new(),
            api_key: None,
        })
    }

    /// Adds a static header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the name or value is not valid in an
    /// HTTP header.
    pub fn with_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let header_name = name.into();
        let header_value = value.into();
        HeaderName::from_bytes(header_name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(header_name.clone()))?;
        HeaderValue::from_str(&header_value)
            .map_err(|_| ConfigError::InvalidHeaderValue(header_name.clone()))?;
        self.headers.push((header_name, header_value));
        Ok(self)
    }

    /// Sets the bearer credential.
    #[must_use]
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the static headers in configuration order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the bearer credential, if configured.
    #[must_use]
    pub const fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }
}
