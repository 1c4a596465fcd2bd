//! NodeStore Trait - Document Store Abstraction Layer
//!
//! This module defines the `NodeStore` and `UserStore` traits that abstract the
//! hosted document database. Business logic in `NodeGateway` and
//! `AccountService` only sees these traits, so the Firestore adapter and the
//! in-memory store are interchangeable.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All methods are async; the production backend is a
//!    network service
//! 2. **Ownership Semantics**: Methods take ownership of inputs to avoid
//!    unnecessary cloning (caller can clone if needed)
//! 3. **Error Handling**: Uses `anyhow::Result` for flexible error context; the
//!    gateway layer turns every error into a tagged `failed` outcome
//! 4. **No transactions**: Each call is one remote request; a read following a
//!    write from another caller may observe either state
//!
//! # Examples
//!
//! ```rust
//! use folio_core::db::{MemoryStore, NodeStore};
//! use folio_core::models::NewNode;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store: Arc<dyn NodeStore> = Arc::new(MemoryStore::new());
//! let id = store
//!     .create_node(NewNode::new("Poster", "Gig poster", "user-1"))
//!     .await?;
//! assert!(store.get_node(&id).await?.is_some());
//! # Ok(())
//! # }
//! ```

use crate::models::{NewNode, Node, NodeUpdate, UserProfile};
use anyhow::Result;
use async_trait::async_trait;

/// Abstraction over the `nodes` collection
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow usage in async contexts where
/// futures may be moved between threads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Insert a new node
    ///
    /// The store assigns the id and a server-side `createdAt`, and starts the
    /// image list empty.
    ///
    /// # Returns
    ///
    /// The id of the created document.
    async fn create_node(&self, node: NewNode) -> Result<String>;

    /// All nodes, in store order, unfiltered
    ///
    /// An empty collection is `Ok(vec![])`, not an error.
    async fn list_nodes(&self) -> Result<Vec<Node>>;

    /// Get node by ID
    ///
    /// # Returns
    ///
    /// - `Ok(Some(node))` if node exists
    /// - `Ok(None)` if node doesn't exist (not an error)
    /// - `Err(_)` if the store could not answer
    async fn get_node(&self, id: &str) -> Result<Option<Node>>;

    /// Apply a field-level patch
    ///
    /// Fields not named by the patch are left untouched. Fails when the
    /// document does not exist.
    async fn update_node(&self, id: &str, update: NodeUpdate) -> Result<()>;

    /// Hard delete
    ///
    /// No existence check precedes the delete; removing an unknown id
    /// succeeds.
    async fn delete_node(&self, id: &str) -> Result<()>;
}

/// Abstraction over the `users` collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Write (or overwrite) the profile document for `user_id`
    async fn put_profile(&self, user_id: &str, profile: UserProfile) -> Result<()>;

    /// Read a profile document; `Ok(None)` when it does not exist
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;
}
