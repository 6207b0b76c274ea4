//! `reqwest`-backed transport.

use crate::invocation::{
    domain::{HttpResponse, PreparedRequest},
    ports::{HttpTransport, HttpTransportError, HttpTransportResult},
};
use crate::tool::domain::HttpMethod;
use async_trait::async_trait;
use reqwest::{Client, Method, header::CONTENT_TYPE};
use std::time::Duration;

/// Transport sending requests through a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpTransportError::Request`] when the TLS backend cannot
    /// be initialized.
    pub fn new(timeout: Duration) -> HttpTransportResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HttpTransportError::request)?;
        Ok(Self { client })
    }
}

const fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Options => Method::OPTIONS,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Trace => Method::TRACE,
    }
}

fn transport_error(err: reqwest::Error) -> HttpTransportError {
    if err.is_timeout() {
        HttpTransportError::Timeout
    } else {
        HttpTransportError::request(err)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &PreparedRequest) -> HttpTransportResult<HttpResponse> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method()), request.url());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(HttpResponse::new(status, content_type, body.to_vec()))
    }
}
