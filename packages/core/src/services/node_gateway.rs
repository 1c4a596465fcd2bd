//! Persistence Gateway
//!
//! `NodeGateway` is the only entry point to node records. It:
//!
//! - validates inputs before any remote call (`invalid`)
//! - turns a missing record on the read path into `not-found`
//! - folds every store fault into `failed` with the cause in the message
//! - emits a [`DomainEvent`] after each successful mutation
//!
//! There are no retries and no existence checks before writes.

use crate::db::{DomainEvent, NodeStore};
use crate::models::{NewNode, Node, NodeUpdate};
use crate::services::error::GatewayError;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the domain event channel; slow subscribers lag past this
pub const DOMAIN_EVENT_CHANNEL_CAPACITY: usize = 128;

#[derive(Clone)]
pub struct NodeGateway {
    store: Arc<dyn NodeStore>,
    event_tx: broadcast::Sender<DomainEvent>,
}

impl NodeGateway {
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        let (event_tx, _) = broadcast::channel(DOMAIN_EVENT_CHANNEL_CAPACITY);
        Self { store, event_tx }
    }

    /// Subscribe to node mutations
    ///
    /// Events are sent after the store acknowledged the write. A receiver
    /// created after a mutation does not see it.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.event_tx.subscribe()
    }

    fn emit_event(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    /// Insert a node; the store assigns id and `createdAt`
    pub async fn create(&self, node: NewNode) -> Result<String, GatewayError> {
        let node = node.normalized();
        node.validate()?;

        let id = self.store.create_node(node).await.map_err(|e| {
            tracing::error!("Failed to create node: {:#}", e);
            GatewayError::failed("Failed to create node", format!("{:#}", e))
        })?;

        tracing::info!("Created node {}", id);
        self.emit_event(DomainEvent::NodeCreated { id: id.clone() });
        Ok(id)
    }

    /// Every node, in store order
    pub async fn list(&self) -> Result<Vec<Node>, GatewayError> {
        let nodes = self.store.list_nodes().await.map_err(|e| {
            tracing::error!("Failed to retrieve nodes: {:#}", e);
            GatewayError::failed("Failed to retrieve nodes", format!("{:#}", e))
        })?;

        tracing::debug!("Retrieved {} nodes", nodes.len());
        Ok(nodes)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Node, GatewayError> {
        validate_id(id)?;

        match self.store.get_node(id).await {
            Ok(Some(node)) => Ok(node),
            Ok(None) => {
                tracing::debug!("Node {} not found", id);
                Err(GatewayError::not_found(id))
            }
            Err(e) => {
                tracing::error!("Failed to retrieve node {}: {:#}", id, e);
                Err(GatewayError::failed(
                    "Failed to retrieve node",
                    format!("{:#}", e),
                ))
            }
        }
    }

    /// Field-level patch
    ///
    /// An empty patch succeeds without touching the store.
    pub async fn update(&self, id: &str, update: NodeUpdate) -> Result<(), GatewayError> {
        validate_id(id)?;
        let update = update.normalized();
        update.validate()?;

        if update.is_empty() {
            tracing::debug!("Empty patch for node {}, nothing to write", id);
            return Ok(());
        }

        self.store
            .update_node(id, update.clone())
            .await
            .map_err(|e| {
                tracing::error!("Failed to update node {}: {:#}", id, e);
                GatewayError::failed("Failed to update node", format!("{:#}", e))
            })?;

        tracing::info!("Updated node {} ({:?})", id, update.field_paths());
        self.emit_event(DomainEvent::NodeUpdated {
            id: id.to_string(),
            update,
        });
        Ok(())
    }

    /// Patch from untyped JSON; `id`, `createdAt` and `createdBy` are dropped
    pub async fn update_from_json(&self, id: &str, patch: Value) -> Result<(), GatewayError> {
        let update = NodeUpdate::from_json_patch(patch)?;
        self.update(id, update).await
    }

    /// Hard delete without an existence check
    ///
    /// Images referenced by the node stay in object storage.
    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        validate_id(id)?;

        self.store.delete_node(id).await.map_err(|e| {
            tracing::error!("Failed to delete node {}: {:#}", id, e);
            GatewayError::failed("Failed to delete node", format!("{:#}", e))
        })?;

        tracing::info!("Deleted node {}", id);
        self.emit_event(DomainEvent::NodeDeleted { id: id.to_string() });
        Ok(())
    }
}

/// Ids are single path segments in the document store
pub(crate) fn validate_id(id: &str) -> Result<(), GatewayError> {
    if id.trim().is_empty() {
        return Err(GatewayError::invalid("node id must not be empty"));
    }
    if id.contains('/') {
        return Err(GatewayError::invalid(format!(
            "node id must not contain '/': {}",
            id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, MockNodeStore};
    use anyhow::anyhow;
    use serde_json::json;

    fn memory_gateway() -> NodeGateway {
        NodeGateway::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let gateway = memory_gateway();
        let id = gateway
            .create(NewNode::new("Poster", "Gig poster", "user-1").with_tags(["print"]))
            .await
            .unwrap();

        let node = gateway.get_by_id(&id).await.unwrap();
        assert_eq!(node.title, "Poster");
        assert_eq!(node.created_by, "user-1");
        assert!(node.images.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_store() {
        let mut store = MockNodeStore::new();
        store.expect_create_node().never();
        store.expect_update_node().never();
        let gateway = NodeGateway::new(Arc::new(store));

        let err = gateway
            .create(NewNode::new("", "desc", "user-1"))
            .await
            .unwrap_err();
        assert_eq!(err.outcome(), "invalid");

        let err = gateway
            .update("n1", NodeUpdate::new().with_tags(["a", "a"]))
            .await
            .unwrap_err();
        assert_eq!(err.outcome(), "invalid");
    }

    #[tokio::test]
    async fn test_store_failure_becomes_failed_with_cause() {
        let mut store = MockNodeStore::new();
        store
            .expect_get_node()
            .returning(|_| Err(anyhow!("permission denied")));
        let gateway = NodeGateway::new(Arc::new(store));

        let err = gateway.get_by_id("n1").await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Failed("Failed to retrieve node: permission denied".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_node_is_not_found() {
        let gateway = memory_gateway();
        let err = gateway.get_by_id("ghost").await.unwrap_err();
        assert_eq!(err, GatewayError::not_found("ghost"));
    }

    #[tokio::test]
    async fn test_update_missing_node_is_failed() {
        let gateway = memory_gateway();
        let err = gateway
            .update("ghost", NodeUpdate::new().with_title("x"))
            .await
            .unwrap_err();
        assert_eq!(err.outcome(), "failed");
    }

    #[tokio::test]
    async fn test_json_patch_cannot_rewrite_owner() {
        let gateway = memory_gateway();
        let id = gateway
            .create(NewNode::new("t", "d", "owner"))
            .await
            .unwrap();
        let before = gateway.get_by_id(&id).await.unwrap();

        gateway
            .update_from_json(
                &id,
                json!({ "createdBy": "mallory", "createdAt": "2000-01-01T00:00:00Z", "nodeTitle": "t2" }),
            )
            .await
            .unwrap();

        let after = gateway.get_by_id(&id).await.unwrap();
        assert_eq!(after.title, "t2");
        assert_eq!(after.created_by, before.created_by);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_blank_category_patch_clears_category() {
        let gateway = memory_gateway();
        let id = gateway
            .create(NewNode::new("t", "d", "u").with_category("Branding"))
            .await
            .unwrap();

        gateway
            .update_from_json(&id, json!({ "category": "  " }))
            .await
            .unwrap();

        assert_eq!(gateway.get_by_id(&id).await.unwrap().category, None);
    }

    #[tokio::test]
    async fn test_empty_patch_skips_store() {
        let mut store = MockNodeStore::new();
        store.expect_update_node().never();
        let gateway = NodeGateway::new(Arc::new(store));

        gateway.update("n1", NodeUpdate::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_events_follow_mutations() {
        let gateway = memory_gateway();
        let mut events = gateway.subscribe_to_events();

        let id = gateway.create(NewNode::new("t", "d", "u")).await.unwrap();
        gateway
            .update(&id, NodeUpdate::new().with_description("d2"))
            .await
            .unwrap();
        gateway.delete(&id).await.unwrap();

        let kinds: Vec<String> = (0..3)
            .map(|_| events.try_recv().unwrap().event_type().to_string())
            .collect();
        assert_eq!(kinds, vec!["node:created", "node:updated", "node:deleted"]);
    }

    #[tokio::test]
    async fn test_slash_in_id_is_invalid() {
        let gateway = memory_gateway();
        let err = gateway.delete("nodes/abc").await.unwrap_err();
        assert_eq!(err.outcome(), "invalid");
    }
}
