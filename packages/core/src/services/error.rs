//! Service Layer Error Types
//!
//! This module defines the error types returned by the gateways, the upload
//! orchestrator and the account service. Each maps onto one tagged outcome
//! (`not-found`, `failed`, `invalid`, ...) with an HTTP-style status.

use crate::models::ValidationError;
use crate::utils::format_file_size;
use thiserror::Error;

/// Gateway outcome errors
///
/// `Failed` carries the contextual message built at the gateway boundary
/// (for example `Failed to retrieve node: <cause>`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Read path only: the record does not exist
    #[error("Node not found: {id}")]
    NotFound { id: String },

    /// The remote call failed; the message holds the cause
    #[error("{0}")]
    Failed(String),

    /// Input rejected before any remote call
    #[error("Invalid input: {0}")]
    Invalid(String),
}

impl GatewayError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Fold an unexpected fault into `Failed`, prefixed with what was attempted
    pub fn failed(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::Failed(format!("{}: {}", context, cause))
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Outcome tag used in response codes
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not-found",
            Self::Failed(_) => "failed",
            Self::Invalid(_) => "invalid",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Failed(_) => 500,
            Self::Invalid(_) => 400,
        }
    }
}

impl From<ValidationError> for GatewayError {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Upload orchestration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Unsupported file type '{content_type}'; use JPEG, PNG, GIF or WebP")]
    UnsupportedType { content_type: String },

    #[error("File is too large ({}); the limit is {}", readable(.size), readable(.limit))]
    TooLarge { size: u64, limit: u64 },

    /// A gateway step failed; passed through unmodified
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The background task went away without reporting
    #[error("Upload {0} ended without a result")]
    Interrupted(String),
}

impl UploadError {
    /// True for rejections raised before any remote call
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::UnsupportedType { .. } | Self::TooLarge { .. })
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } | Self::TooLarge { .. } => "invalid",
            Self::Gateway(err) => err.outcome(),
            Self::Interrupted(_) => "failed",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::UnsupportedType { .. } | Self::TooLarge { .. } => 400,
            Self::Gateway(err) => err.status(),
            Self::Interrupted(_) => 500,
        }
    }
}

fn readable(bytes: &u64) -> String {
    format_file_size(*bytes)
}

/// Account operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// The identity provider refused the credentials or the signup
    #[error("{0}")]
    Rejected(String),

    /// The identity provider could not be reached or answered unexpectedly
    #[error("Identity service failed: {0}")]
    Unavailable(String),
}

impl AccountError {
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "invalid",
            Self::Rejected(_) => "unauthorized",
            Self::Unavailable(_) => "failed",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::MissingField(_) => 400,
            Self::Rejected(_) => 401,
            Self::Unavailable(_) => 500,
        }
    }
}
