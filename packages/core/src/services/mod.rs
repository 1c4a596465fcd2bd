//! Business Services
//!
//! This module contains the services that sit between the stores and the
//! API layer:
//!
//! - `NodeGateway` - validated, tagged CRUD over node records
//! - `AssetGateway` - image upload and delete against object storage
//! - `UploadOrchestrator` - upload → link flow with per-upload progress
//! - `AccountService` - sign-up, sign-in and profile lookup
//! - `GatewayResponse` - the `{code, status, message, payload}` envelope

pub mod account_service;
pub mod asset_gateway;
pub mod error;
pub mod node_gateway;
pub mod response;
pub mod upload_orchestrator;

pub use account_service::AccountService;
pub use asset_gateway::AssetGateway;
pub use error::{AccountError, GatewayError, UploadError};
pub use node_gateway::{NodeGateway, DOMAIN_EVENT_CHANNEL_CAPACITY};
pub use response::GatewayResponse;
pub use upload_orchestrator::{
    UploadId, UploadOrchestrator, UploadProgress, UploadRegistry, UploadStatus, UploadTicket,
};
