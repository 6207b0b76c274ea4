//! Base URL declared by the description itself.

use reqwest::Url;
use serde_json::Value;

/// Returns the first absolute `http(s)` entry of the top-level `servers`
/// list.
///
/// Relative entries and templated URLs that do not parse are skipped.
#[must_use]
pub fn declared_base_url(description: &Value) -> Option<String> {
    description
        .get("servers")?
        .as_array()?
        .iter()
        .filter_map(|server| server.get("url").and_then(Value::as_str))
        .find(|candidate| {
            Url::parse(candidate).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
        })
        .map(str::to_owned)
}
