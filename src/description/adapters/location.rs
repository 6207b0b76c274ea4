//! Dispatches each location to the matching loader.

use super::{FileDescriptionLoader, HttpDescriptionLoader};
use crate::description::{
    domain::DescriptionLocation,
    ports::{DescriptionLoadResult, DescriptionLoader},
};
use async_trait::async_trait;
use serde_json::Value;

/// Loader reading files from disk and URLs over HTTP.
#[derive(Debug, Clone)]
pub struct LocationDescriptionLoader {
    file: FileDescriptionLoader,
    http: HttpDescriptionLoader,
}

impl LocationDescriptionLoader {
    /// Creates a dispatcher over the given HTTP loader.
    #[must_use]
    pub const fn new(http: HttpDescriptionLoader) -> Self {
        Self {
            file: FileDescriptionLoader,
            http,
        }
    }
}

#[async_trait]
impl DescriptionLoader for LocationDescriptionLoader {
    async fn load(&self, location: &DescriptionLocation) -> DescriptionLoadResult<Value> {
        match location {
            DescriptionLocation::File(_) => self.file.load(location).await,
            DescriptionLocation::Url(_) => self.http.load(location).await,
        }
    }
}
