//! Fetches descriptions over HTTP.

use crate::description::{
    domain::DescriptionLocation,
    ports::{DescriptionLoadError, DescriptionLoadResult, DescriptionLoader, decode_document},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Loader for [`DescriptionLocation::Url`] locations.
#[derive(Debug, Clone)]
pub struct HttpDescriptionLoader {
    client: Client,
}

impl HttpDescriptionLoader {
    /// Creates a loader whose fetches time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] when the client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Creates a loader around an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DescriptionLoader for HttpDescriptionLoader {
    async fn load(&self, location: &DescriptionLocation) -> DescriptionLoadResult<Value> {
        let DescriptionLocation::Url(url) = location else {
            return Err(DescriptionLoadError::NotFound(location.to_string()));
        };
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| DescriptionLoadError::http(location, err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DescriptionLoadError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| DescriptionLoadError::http(location, err))?;
        debug!(%location, bytes = bytes.len(), "fetched description");
        decode_document(location, &bytes)
    }
}
