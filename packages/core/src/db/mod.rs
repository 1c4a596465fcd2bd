//! Document Store Layer
//!
//! Node records and user profiles live behind two traits:
//!
//! - [`NodeStore`] - the `nodes` collection (create / list / get / patch / delete)
//! - [`UserStore`] - the `users` collection (profile documents)
//!
//! Two implementations ship with the crate:
//!
//! - [`FirestoreStore`] - hosted Firestore over its REST API
//! - [`MemoryStore`] - in-process, for tests and local work
//!
//! [`RestClient`] carries the transport details shared with the storage and
//! identity adapters, and [`DomainEvent`] describes node changes for
//! subscribers.

mod error;
pub mod events;
mod firestore;
mod memory_store;
mod node_store;
mod rest;

pub use error::StoreError;
pub use events::DomainEvent;
pub use firestore::FirestoreStore;
pub use memory_store::MemoryStore;
pub use node_store::{NodeStore, UserStore};
pub use rest::RestClient;

#[cfg(test)]
pub use node_store::{MockNodeStore, MockUserStore};
