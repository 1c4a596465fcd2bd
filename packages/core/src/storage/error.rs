//! Object storage errors

use crate::storage::url::DownloadUrlError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Object does not exist: {0}")]
    ObjectNotFound(String),

    #[error("Object {0} has no download token")]
    MissingDownloadToken(String),

    #[error(transparent)]
    MalformedUrl(#[from] DownloadUrlError),
}
