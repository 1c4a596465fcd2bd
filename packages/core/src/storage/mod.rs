//! Object Storage Layer
//!
//! Binary image assets live here, apart from node records:
//!
//! - [`ObjectStore`] - the storage seam (put / resolve URL / delete)
//! - [`FirebaseStorage`] - hosted adapter over the Storage REST API
//! - [`MemoryObjectStore`] - in-process adapter with the same URL shape
//! - [`url`] - the download-URL contract shared by every adapter

mod error;
mod firebase_storage;
mod memory_storage;
mod object_store;
pub mod url;

pub use error::StorageError;
pub use firebase_storage::FirebaseStorage;
pub use memory_storage::MemoryObjectStore;
pub use object_store::ObjectStore;
pub use url::{node_image_path, object_path_from_url, DownloadUrlError};

#[cfg(test)]
pub use object_store::MockObjectStore;
