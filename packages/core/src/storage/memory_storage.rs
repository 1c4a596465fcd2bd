//! In-process object storage
//!
//! Stores blobs in a map and hands out download URLs with the same shape the
//! hosted service uses, so URL parsing is exercised exactly as in production.

use crate::storage::error::StorageError;
use crate::storage::object_store::ObjectStore;
use crate::storage::url;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

const MEMORY_ENDPOINT: &str = "http://localhost:9199/v0";

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
    token: String,
}

pub struct MemoryObjectStore {
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.objects.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Bytes and content type stored at `path`
    pub async fn object(&self, path: &str) -> Option<(Vec<u8>, String)> {
        self.objects
            .read()
            .await
            .get(path)
            .map(|o| (o.bytes.clone(), o.content_type.clone()))
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new("folio.local")
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let object = StoredObject {
            bytes,
            content_type: content_type.to_string(),
            token: Uuid::new_v4().to_string(),
        };
        self.objects.write().await.insert(path.to_string(), object);
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        let objects = self.objects.read().await;
        let object = objects
            .get(path)
            .ok_or_else(|| StorageError::ObjectNotFound(path.to_string()))?;
        Ok(url::download_url(
            MEMORY_ENDPOINT,
            &self.bucket,
            path,
            &object.token,
        ))
    }

    async fn delete_object(&self, path: &str) -> Result<()> {
        self.objects
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::ObjectNotFound(path.to_string()).into())
    }
}
