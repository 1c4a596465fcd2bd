//! Firebase Storage adapter
//!
//! Talks to the Storage REST API (`/v0/b/{bucket}/o`). Uploading and URL
//! resolution are separate requests, just like the SDK's `uploadBytes` and
//! `getDownloadURL`; the URL embeds the first download token from the
//! object's metadata.

use crate::config::FolioConfig;
use crate::db::{RestClient, StoreError};
use crate::storage::error::StorageError;
use crate::storage::object_store::ObjectStore;
use crate::storage::url;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    #[serde(default)]
    download_tokens: Option<String>,
}

pub struct FirebaseStorage {
    rest: RestClient,
    endpoint: String,
    bucket: String,
}

impl FirebaseStorage {
    pub fn new(rest: RestClient, endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            rest,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        }
    }

    pub fn from_config(config: &FolioConfig) -> Result<Self, StoreError> {
        Ok(Self::new(
            RestClient::from_config(config)?,
            config.firebase.storage_endpoint.clone(),
            config.firebase.storage_bucket.clone(),
        ))
    }

    fn object_url(&self, path: &str) -> String {
        url::object_url(&self.endpoint, &self.bucket, path)
    }
}

#[async_trait]
impl ObjectStore for FirebaseStorage {
    async fn put_object(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let endpoint = format!("{}/b/{}/o", self.endpoint, self.bucket);
        let request = self
            .rest
            .request(Method::POST, &endpoint)
            .query(&[("uploadType", "media"), ("name", path)])
            .header(CONTENT_TYPE, content_type)
            .body(bytes);

        self.rest.expect_success(request, &endpoint).await?;
        tracing::debug!("Stored object {} in bucket {}", path, self.bucket);
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        let endpoint = self.object_url(path);
        let metadata: ObjectMetadata = self
            .rest
            .json(self.rest.request(Method::GET, &endpoint), &endpoint)
            .await?;

        let token = metadata
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').map(str::trim).find(|t| !t.is_empty()))
            .ok_or_else(|| StorageError::MissingDownloadToken(path.to_string()))?;

        Ok(url::download_url(&self.endpoint, &self.bucket, path, token))
    }

    async fn delete_object(&self, path: &str) -> Result<()> {
        let endpoint = self.object_url(path);
        self.rest
            .expect_success(self.rest.request(Method::DELETE, &endpoint), &endpoint)
            .await?;
        tracing::debug!("Deleted object {} from bucket {}", path, self.bucket);
        Ok(())
    }
}
