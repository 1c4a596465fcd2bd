//! ObjectStore Trait - Binary Asset Storage Abstraction
//!
//! Decouples where image bytes live from where node records live. The
//! `AssetGateway` drives an `ObjectStore`; adapters exist for Firebase
//! Storage and for an in-process map.

use anyhow::Result;
use async_trait::async_trait;

/// Abstraction over a hierarchical blob namespace
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` at `path`, replacing anything already there
    async fn put_object(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Resolve the public download URL of an existing object
    async fn download_url(&self, path: &str) -> Result<String>;

    /// Remove the object at `path`; fails if it does not exist
    async fn delete_object(&self, path: &str) -> Result<()>;
}
