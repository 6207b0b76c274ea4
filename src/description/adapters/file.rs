//! Reads descriptions from the local filesystem.

use crate::description::{
    domain::DescriptionLocation,
    ports::{DescriptionLoadError, DescriptionLoadResult, DescriptionLoader, decode_document},
};
use async_trait::async_trait;
use serde_json::Value;

/// Loader for [`DescriptionLocation::File`] locations.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDescriptionLoader;

#[async_trait]
impl DescriptionLoader for FileDescriptionLoader {
    async fn load(&self, location: &DescriptionLocation) -> DescriptionLoadResult<Value> {
        let DescriptionLocation::File(path) = location else {
            return Err(DescriptionLoadError::NotFound(location.to_string()));
        };
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| DescriptionLoadError::io(location, err))?;
        decode_document(location, &bytes)
    }
}
