//! Application state shared across all endpoints
//!
//! Built once at startup from `FolioConfig`. Every service is cheap to clone
//! (they hold `Arc`s), so axum clones the whole state per request.

use folio_core::auth::{AuthProvider, IdentityToolkitAuth, MemoryAuth};
use folio_core::config::{Backend, FolioConfig, UploadConfig};
use folio_core::db::{FirestoreStore, MemoryStore, NodeStore, StoreError, UserStore};
use folio_core::services::{AccountService, AssetGateway, NodeGateway, UploadOrchestrator};
use folio_core::storage::{FirebaseStorage, MemoryObjectStore, ObjectStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub nodes: NodeGateway,
    pub uploads: UploadOrchestrator,
    pub accounts: AccountService,
    /// Largest accepted image, used to size the request body limit
    pub max_upload_bytes: u64,
}

impl AppState {
    pub fn new(
        node_store: Arc<dyn NodeStore>,
        user_store: Arc<dyn UserStore>,
        objects: Arc<dyn ObjectStore>,
        auth: Arc<dyn AuthProvider>,
        upload: UploadConfig,
    ) -> Self {
        let nodes = NodeGateway::new(node_store);
        let max_upload_bytes = upload.max_bytes;
        let uploads = UploadOrchestrator::new(nodes.clone(), AssetGateway::new(objects), upload);
        let accounts = AccountService::new(auth, user_store);

        Self {
            nodes,
            uploads,
            accounts,
            max_upload_bytes,
        }
    }

    /// Everything in process; nothing survives a restart
    pub fn in_memory(upload: UploadConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(
            store.clone(),
            store,
            Arc::new(MemoryObjectStore::default()),
            Arc::new(MemoryAuth::new()),
            upload,
        )
    }

    /// Wire the backend selected by `config.backend`
    pub fn from_config(config: &FolioConfig) -> Result<Self, StoreError> {
        match config.backend {
            Backend::Memory => {
                tracing::warn!("Using in-memory backend, data is lost on exit");
                Ok(Self::in_memory(config.upload.clone()))
            }
            Backend::Firebase => {
                let store = Arc::new(FirestoreStore::from_config(config)?);
                tracing::info!(
                    "Using Firebase project {} (bucket {})",
                    config.firebase.project_id,
                    config.firebase.storage_bucket
                );
                Ok(Self::new(
                    store.clone(),
                    store,
                    Arc::new(FirebaseStorage::from_config(config)?),
                    Arc::new(IdentityToolkitAuth::from_config(config)?),
                    config.upload.clone(),
                ))
            }
        }
    }
}
