//! Folio Core Business Logic Layer
//!
//! This crate provides the data model, backend gateways, upload
//! orchestration and filtering for the Folio portfolio manager.
//!
//! # Architecture
//!
//! - **Fixed-shape records**: a `Node` is a portfolio item with explicit fields
//! - **Hosted backend**: Firestore for records, Firebase Storage for images,
//!   Identity Toolkit for accounts, all over their REST APIs
//! - **Trait seams**: `NodeStore`, `UserStore`, `ObjectStore` and
//!   `AuthProvider` each have a hosted and an in-memory implementation
//! - **Tagged outcomes**: gateways return `Result<_, GatewayError>` and never
//!   leak transport errors
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, NodeUpdate, User, ImageFile)
//! - [`db`] - Document stores (Firestore, in-memory) and domain events
//! - [`storage`] - Object storage (Firebase Storage, in-memory) and URL helpers
//! - [`auth`] - Identity providers
//! - [`services`] - Gateways, upload orchestrator, account service
//! - [`filter`] - In-memory node filtering and facets
//! - [`config`] - Runtime configuration

pub mod auth;
pub mod config;
pub mod db;
pub mod filter;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{Backend, FolioConfig};
pub use filter::{FilterFacets, NodeFilter};
pub use models::*;
pub use services::*;
