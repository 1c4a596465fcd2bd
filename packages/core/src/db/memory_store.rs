//! In-process document store
//!
//! Keeps nodes in insertion order and profiles in a map. Used by the test
//! suites and by the `memory` backend of the server for local work without a
//! hosted project. Semantics follow the hosted store: generated ids,
//! server-side creation time, patch fails on a missing document, delete is
//! idempotent.

use crate::db::node_store::{NodeStore, UserStore};
use crate::models::{NewNode, Node, NodeUpdate, UserProfile};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    nodes: RwLock<Vec<Node>>,
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored nodes
    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

#[async_trait]
impl NodeStore for MemoryStore {
    async fn create_node(&self, node: NewNode) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let record = node.into_node(id.clone(), Utc::now());

        self.nodes.write().await.push(record);
        Ok(id)
    }

    async fn list_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.nodes.read().await.clone())
    }

    async fn get_node(&self, id: &str) -> Result<Option<Node>> {
        let nodes = self.nodes.read().await;
        Ok(nodes.iter().find(|n| n.id == id).cloned())
    }

    async fn update_node(&self, id: &str, update: NodeUpdate) -> Result<()> {
        let mut nodes = self.nodes.write().await;

        let Some(node) = nodes.iter_mut().find(|n| n.id == id) else {
            bail!("No document to update: nodes/{}", id);
        };
        node.apply_update(&update);
        Ok(())
    }

    async fn delete_node(&self, id: &str) -> Result<()> {
        self.nodes.write().await.retain(|n| n.id != id);
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn put_profile(&self, user_id: &str, profile: UserProfile) -> Result<()> {
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile);
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_keeps_insertion_order() -> Result<()> {
        let store = MemoryStore::new();
        let first = store.create_node(NewNode::new("A", "a", "u")).await?;
        let second = store.create_node(NewNode::new("B", "b", "u")).await?;

        let ids: Vec<String> = store
            .list_nodes()
            .await?
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let result = store
            .update_node("ghost", NodeUpdate::new().with_title("x"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_ok() -> Result<()> {
        let store = MemoryStore::new();
        store.delete_node("ghost").await?;
        assert!(store.is_empty().await);
        Ok(())
    }
}
