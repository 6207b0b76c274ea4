//! Raw HTTP responses as returned by a transport.

/// Maximum number of characters of an error body kept for diagnostics.
pub const MAX_ERROR_BODY_CHARS: usize = 2048;

/// Status, content type and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response value.
    #[must_use]
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Creates a `200 OK` response with a JSON body.
    #[must_use]
    pub fn json(body: &serde_json::Value) -> Self {
        Self::new(200, Some("application/json".to_owned()), body.to_string())
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the raw `Content-Type` header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns whether the content type denotes JSON.
    ///
    /// Matches `application/json` and any `+json` structured suffix,
    /// ignoring parameters and case.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type().is_some_and(|content_type| {
            let essence = content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            essence == "application/json" || essence.ends_with("+json")
        })
    }

    /// Returns the body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns the body text cut to [`MAX_ERROR_BODY_CHARS`] characters.
    #[must_use]
    pub fn truncated_text(&self) -> String {
        self.text().chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}
