//! Upload Orchestrator
//!
//! Drives "store bytes → resolve URL → append URL to the node" and publishes
//! per-upload progress.
//!
//! # Progress
//!
//! Each upload owns a `watch` channel of [`UploadProgress`]. While the work
//! runs, a ticker adds `step` percent every `tick` up to `ceiling`; this
//! counter is cosmetic and does not measure transferred bytes. Completion
//! publishes 100, failure resets to 0, and both mark the upload inactive.
//!
//! Uploads run in spawned tasks, so dropping an [`UploadTicket`] does not
//! cancel the work. In-flight uploads are listed by the [`UploadRegistry`].

use crate::config::UploadConfig;
use crate::models::{ImageFile, NodeUpdate, UploadedImage};
use crate::services::asset_gateway::AssetGateway;
use crate::services::error::{GatewayError, UploadError};
use crate::services::node_gateway::{validate_id, NodeGateway};
use crate::storage::node_image_path;
use crate::utils::{is_image_file, unique_file_name};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Identifier of a single upload
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UploadId(String);

impl UploadId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Progress of one upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    pub uploading: bool,
    pub percent: u8,
}

impl UploadProgress {
    fn started() -> Self {
        Self {
            uploading: true,
            percent: 0,
        }
    }

    fn completed() -> Self {
        Self {
            uploading: false,
            percent: 100,
        }
    }

    fn reset() -> Self {
        Self {
            uploading: false,
            percent: 0,
        }
    }
}

/// Snapshot of an in-flight upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatus {
    pub upload_id: UploadId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub file_name: String,
    #[serde(flatten)]
    pub progress: UploadProgress,
}

struct RegistryEntry {
    node_id: Option<String>,
    file_name: String,
    progress: watch::Receiver<UploadProgress>,
}

/// In-flight uploads keyed by id
#[derive(Clone, Default)]
pub struct UploadRegistry {
    entries: Arc<RwLock<BTreeMap<UploadId, RegistryEntry>>>,
}

impl UploadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn insert(&self, id: UploadId, entry: RegistryEntry) {
        self.entries.write().await.insert(id, entry);
    }

    async fn remove(&self, id: &UploadId) {
        self.entries.write().await.remove(id);
    }

    /// Every upload that has not resolved yet
    pub async fn active(&self) -> Vec<UploadStatus> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(id, entry)| UploadStatus {
                upload_id: id.clone(),
                node_id: entry.node_id.clone(),
                file_name: entry.file_name.clone(),
                progress: *entry.progress.borrow(),
            })
            .collect()
    }

    pub async fn progress(&self, id: &UploadId) -> Option<UploadProgress> {
        self.entries
            .read()
            .await
            .get(id)
            .map(|entry| *entry.progress.borrow())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Handle to one running upload
pub struct UploadTicket {
    id: UploadId,
    progress: watch::Receiver<UploadProgress>,
    handle: JoinHandle<Result<String, UploadError>>,
}

impl UploadTicket {
    pub fn id(&self) -> &UploadId {
        &self.id
    }

    /// A fresh receiver for this upload's progress
    pub fn progress(&self) -> watch::Receiver<UploadProgress> {
        self.progress.clone()
    }

    pub fn current(&self) -> UploadProgress {
        *self.progress.borrow()
    }

    /// Wait for the upload to resolve
    pub async fn finish(self) -> Result<UploadedImage, UploadError> {
        match self.handle.await {
            Ok(Ok(image_url)) => Ok(UploadedImage {
                upload_id: self.id.to_string(),
                image_url,
            }),
            Ok(Err(err)) => Err(err),
            Err(join_err) => {
                tracing::error!("Upload task {} stopped: {}", self.id, join_err);
                Err(UploadError::Interrupted(self.id.to_string()))
            }
        }
    }
}

#[derive(Clone)]
pub struct UploadOrchestrator {
    nodes: NodeGateway,
    assets: AssetGateway,
    registry: UploadRegistry,
    config: UploadConfig,
}

impl UploadOrchestrator {
    pub fn new(nodes: NodeGateway, assets: AssetGateway, config: UploadConfig) -> Self {
        Self {
            nodes,
            assets,
            registry: UploadRegistry::new(),
            config,
        }
    }

    pub fn registry(&self) -> &UploadRegistry {
        &self.registry
    }

    /// Type and size checks applied before anything is sent
    pub fn validate(&self, file: &ImageFile) -> Result<(), UploadError> {
        if !is_image_file(file) {
            return Err(UploadError::UnsupportedType {
                content_type: file.content_type.clone(),
            });
        }
        if file.size() > self.config.max_bytes {
            return Err(UploadError::TooLarge {
                size: file.size(),
                limit: self.config.max_bytes,
            });
        }
        Ok(())
    }

    /// Upload an image and append its URL to the node
    ///
    /// Rejections come back immediately; otherwise the returned ticket
    /// resolves with the download URL.
    pub async fn add_image(
        &self,
        node_id: &str,
        file: ImageFile,
    ) -> Result<UploadTicket, UploadError> {
        validate_id(node_id)?;
        self.validate(&file)?;

        let path = node_image_path(node_id, Utc::now().timestamp_millis(), &file.file_name);
        let file_name = file.file_name.clone();
        let nodes = self.nodes.clone();
        let assets = self.assets.clone();
        let target = node_id.to_string();

        let work = async move {
            let url = assets.upload(file, &path).await?;
            nodes
                .update(&target, NodeUpdate::append_image(url.clone()))
                .await?;
            Ok::<_, UploadError>(url)
        };

        Ok(self.start(Some(node_id.to_string()), file_name, work).await)
    }

    /// `add_image`, waiting for the result
    pub async fn add_image_and_wait(
        &self,
        node_id: &str,
        file: ImageFile,
    ) -> Result<UploadedImage, UploadError> {
        self.add_image(node_id, file).await?.finish().await
    }

    /// Upload to an explicit path without linking it to a node
    pub async fn upload_to_path(
        &self,
        file: ImageFile,
        path: &str,
    ) -> Result<UploadTicket, UploadError> {
        self.validate(&file)?;

        let file_name = file.file_name.clone();
        let assets = self.assets.clone();
        let path = path.to_string();
        let work = async move { Ok::<_, UploadError>(assets.upload(file, &path).await?) };

        Ok(self.start(None, file_name, work).await)
    }

    /// Upload under `folder` with a collision-free `{base}_{timestamp}.{ext}` name
    pub async fn upload_to_folder(
        &self,
        file: ImageFile,
        folder: &str,
    ) -> Result<UploadTicket, UploadError> {
        let name = unique_file_name(&file.file_name, Utc::now().timestamp_millis());
        let path = format!("{}/{}", folder.trim_end_matches('/'), name);
        self.upload_to_path(file, &path).await
    }

    /// Delete the object, then drop every occurrence of `url` from the node
    pub async fn remove_image(&self, node_id: &str, url: &str) -> Result<(), GatewayError> {
        validate_id(node_id)?;
        self.assets.delete(url).await?;
        self.nodes
            .update(node_id, NodeUpdate::remove_image(url))
            .await?;
        tracing::info!("Removed image from node {}", node_id);
        Ok(())
    }

    async fn start<F>(&self, node_id: Option<String>, file_name: String, work: F) -> UploadTicket
    where
        F: Future<Output = Result<String, UploadError>> + Send + 'static,
    {
        let id = UploadId::generate();
        let (progress_tx, progress_rx) = watch::channel(UploadProgress::started());

        self.registry
            .insert(
                id.clone(),
                RegistryEntry {
                    node_id,
                    file_name,
                    progress: progress_rx.clone(),
                },
            )
            .await;
        tracing::debug!("Upload {} started", id);

        let registry = self.registry.clone();
        let config = self.config.clone();
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            let result = drive(work, &progress_tx, &config).await;
            match &result {
                Ok(_) => {
                    progress_tx.send_replace(UploadProgress::completed());
                    tracing::info!("Upload {} completed", task_id);
                }
                Err(err) => {
                    progress_tx.send_replace(UploadProgress::reset());
                    tracing::warn!("Upload {} failed: {}", task_id, err);
                }
            }
            registry.remove(&task_id).await;
            result
        });

        UploadTicket {
            id,
            progress: progress_rx,
            handle,
        }
    }
}

/// Run `work` while ticking the cosmetic progress counter
async fn drive<F>(
    work: F,
    progress: &watch::Sender<UploadProgress>,
    config: &UploadConfig,
) -> Result<String, UploadError>
where
    F: Future<Output = Result<String, UploadError>>,
{
    tokio::pin!(work);
    let mut ticker = tokio::time::interval(config.tick());
    // First tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            result = &mut work => return result,
            _ = ticker.tick() => {
                progress.send_if_modified(|p| {
                    let next = p.percent.saturating_add(config.step).min(config.ceiling);
                    let changed = next != p.percent;
                    p.percent = next;
                    changed
                });
            }
        }
    }
}
