//! Object Storage Gateway
//!
//! Puts image bytes into object storage and hands back a public download
//! URL; deletes objects by parsing that URL back into a storage path.

use crate::models::ImageFile;
use crate::services::error::GatewayError;
use crate::storage::{object_path_from_url, ObjectStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AssetGateway {
    store: Arc<dyn ObjectStore>,
}

impl AssetGateway {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Store `file` at `path`, then resolve its download URL
    ///
    /// Both steps must succeed. A blob written before a failed URL lookup is
    /// left in place.
    pub async fn upload(&self, file: ImageFile, path: &str) -> Result<String, GatewayError> {
        let size = file.size();
        self.store
            .put_object(path, file.bytes, &file.content_type)
            .await
            .map_err(|e| {
                tracing::error!("Error uploading image to {}: {:#}", path, e);
                GatewayError::failed("Failed to upload image", format!("{:#}", e))
            })?;

        let url = self.store.download_url(path).await.map_err(|e| {
            tracing::error!("Error resolving download URL for {}: {:#}", path, e);
            GatewayError::failed("Failed to upload image", format!("{:#}", e))
        })?;

        tracing::info!("Uploaded image {} ({} bytes)", path, size);
        Ok(url)
    }

    /// Remove the object a download URL points at
    pub async fn delete(&self, url: &str) -> Result<(), GatewayError> {
        let path = object_path_from_url(url).map_err(|e| GatewayError::invalid(e.to_string()))?;

        self.store.delete_object(&path).await.map_err(|e| {
            tracing::error!("Error deleting image {}: {:#}", path, e);
            GatewayError::failed("Failed to delete image", format!("{:#}", e))
        })?;

        tracing::info!("Deleted image {}", path);
        Ok(())
    }
}
