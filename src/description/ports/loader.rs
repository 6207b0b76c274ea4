//! Description loader port.

use crate::description::domain::DescriptionLocation;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for description loading.
pub type DescriptionLoadResult<T> = Result<T, DescriptionLoadError>;

/// Reads and decodes a description document.
#[async_trait]
pub trait DescriptionLoader: Send + Sync {
    /// Loads the document at `location`.
    async fn load(&self, location: &DescriptionLocation) -> DescriptionLoadResult<Value>;
}

/// Errors returned by description loaders.
#[derive(Debug, Clone, Error)]
pub enum DescriptionLoadError {
    /// The document could not be read from disk.
    #[error("failed to read description '{location}': {source}")]
    Io {
        /// Location being read.
        location: String,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },

    /// The document could not be fetched.
    #[error("failed to fetch description '{location}': {source}")]
    Http {
        /// Location being fetched.
        location: String,
        /// Underlying client failure.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-success status.
    #[error("fetching description '{location}' returned status {status}")]
    Status {
        /// Location being fetched.
        location: String,
        /// Response status code.
        status: u16,
    },

    /// The document is not valid JSON.
    #[error("description '{location}' is not valid JSON: {reason}")]
    Decode {
        /// Location being decoded.
        location: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The adapter has no document for the location.
    #[error("no description available at '{0}'")]
    NotFound(String),
}

impl DescriptionLoadError {
    /// Wraps an I/O failure.
    #[must_use]
    pub fn io(location: &DescriptionLocation, err: std::io::Error) -> Self {
        Self::Io {
            location: location.to_string(),
            source: Arc::new(err),
        }
    }

    /// Wraps an HTTP client failure.
    pub fn http(
        location: &DescriptionLocation,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Http {
            location: location.to_string(),
            source: Arc::new(err),
        }
    }

    /// Wraps a JSON decoding failure.
    #[must_use]
    pub fn decode(location: &DescriptionLocation, err: &serde_json::Error) -> Self {
        Self::Decode {
            location: location.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Decodes raw document bytes.
///
/// # Errors
///
/// Returns [`DescriptionLoadError::Decode`] when `bytes` is not JSON.
pub fn decode_document(
    location: &DescriptionLocation,
    bytes: &[u8],
) -> DescriptionLoadResult<Value> {
    serde_json::from_slice(bytes).map_err(|err| DescriptionLoadError::decode(location, &err))
}
