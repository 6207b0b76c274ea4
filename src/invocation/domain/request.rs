//! Building the HTTP request for one tool call.

use super::{InvokerConfig, RequestBuildError};
use crate::tool::domain::{BODY_PARAMETER, HttpMethod, ToolDefinition};
use reqwest::Url;
use secrecy::ExposeSecret;
use serde_json::{Map, Value};

/// `Accept` header sent unless a static header overrides it.
pub const ACCEPT: &str = "application/json, text/plain;q=0.9, */*;q=0.8";

/// A fully resolved HTTP request, independent of any HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl PreparedRequest {
    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the absolute URL including any query string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the headers in send order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the first header value with a case-insensitive name match.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the JSON payload, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Builds the request for calling `tool` with validated `arguments`.
///
/// Static headers are merged first. A generated `Content-Type` or bearer
/// `Authorization` replaces any static header of the same name.
///
/// # Examples
///
/// ```
/// use portico::invocation::domain::{InvokerConfig, prepare_request};
/// use portico::tool::services::generate_tools;
/// use serde_json::json;
///
/// let registry = generate_tools(&json!({
///     "paths": {"/users/{id}": {"get": {"operationId": "getUserById"}}}
/// }));
/// let tool = registry.get("get_user_by_id").expect("tool compiles");
/// let config = InvokerConfig::new("https://api.example.com/").expect("valid URL");
/// let arguments = json!({"id": 7});
///
/// let request = prepare_request(&config, tool, arguments.as_object().expect("object"))
///     .expect("request builds");
/// assert_eq!(request.url(), "https://api.example.com/users/7");
/// ```
///
/// # Errors
///
/// Returns [`RequestBuildError::MissingPathParameter`] when a path token has
/// no value and [`RequestBuildError::InvalidUrl`] when the result does not
/// parse.
pub fn prepare_request(
    config: &InvokerConfig,
    tool: &ToolDefinition,
    arguments: &Map<String, Value>,
) -> Result<PreparedRequest, RequestBuildError> {
    let operation = tool.operation();
    let path = expand_path(operation.path(), arguments)?;
    let separator = if path.starts_with('/') { "" } else { "/" };
    let raw_url = format!("{}{separator}{path}", config.base_url());
    let mut url = Url::parse(&raw_url).map_err(|err| RequestBuildError::InvalidUrl {
        url: raw_url.clone(),
        reason: err.to_string(),
    })?;

    let pairs = query_pairs(tool, arguments);
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    let body = if operation.accepts_body() {
        arguments
            .get(BODY_PARAMETER)
            .filter(|payload| is_truthy(payload))
            .cloned()
    } else {
        None
    };

    let mut headers = Vec::with_capacity(config.headers().len() + 3);
    if !config
        .headers()
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case("accept"))
    {
        headers.push(("Accept".to_owned(), ACCEPT.to_owned()));
    }
    let overridden = |name: &str| {
        (body.is_some() && name.eq_ignore_ascii_case("content-type"))
            || (config.api_key().is_some() && name.eq_ignore_ascii_case("authorization"))
    };
    headers.extend(
        config
            .headers()
            .iter()
            .filter(|(name, _)| !overridden(name))
            .cloned(),
    );
    if body.is_some() {
        headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
    }
    if let Some(api_key) = config.api_key() {
        headers.push((
            "Authorization".to_owned(),
            format!("Bearer {}", api_key.expose_secret()),
        ));
    }

    Ok(PreparedRequest {
        method: operation.method(),
        url: String::from(url),
        headers,
        body,
    })
}

/// Replaces every `{token}` with the percent-encoded argument value.
fn expand_path(template: &str, arguments: &Map<String, Value>) -> Result<String, RequestBuildError> {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((before, after_open)) = rest.split_once('{') {
        expanded.push_str(before);
        let Some((token, after_close)) = after_open.split_once('}') else {
            expanded.push('{');
            rest = after_open;
            break;
        };
        if token.is_empty() {
            expanded.push_str("{}");
        } else {
            let value = arguments
                .get(token)
                .filter(|candidate| !candidate.is_null())
                .ok_or_else(|| RequestBuildError::MissingPathParameter(token.to_owned()))?;
            expanded.push_str(&urlencoding::encode(&scalar_text(value)));
        }
        rest = after_close;
    }
    expanded.push_str(rest);
    Ok(expanded)
}

/// Collects query pairs in declaration order.
///
/// Arrays expand to one pair per element; `null` values are skipped.
fn query_pairs(tool: &ToolDefinition, arguments: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for parameter in tool.operation().query_parameters() {
        match arguments.get(parameter.name()) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => pairs.extend(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| (parameter.name().to_owned(), scalar_text(item))),
            ),
            Some(value) => pairs.push((parameter.name().to_owned(), scalar_text(value))),
        }
    }
    pairs
}

/// Strings are used verbatim; everything else is compact JSON text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(number) => number.as_f64() != Some(0.0),
        Value::String(text) => !text.is_empty(),
        Value::Bool(true) | Value::Array(_) | Value::Object(_) => true,
    }
}
