//! Domain Events for node changes
//!
//! The persistence gateway emits these after each successful mutation so that
//! other parts of the system (the HTTP layer, tests, future live views) can
//! follow changes without coupling to a particular store.
//!
//! # Architecture
//!
//! Events are emitted using tokio's broadcast channel, allowing multiple subscribers
//! to receive notifications asynchronously. A lagging subscriber loses old
//! events; it never blocks a writer.

use crate::models::NodeUpdate;

/// Domain events emitted by `NodeGateway`
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A new node was created with this id
    NodeCreated { id: String },

    /// A node was patched
    NodeUpdated { id: String, update: NodeUpdate },

    /// A delete was issued for this id (whether or not it existed)
    NodeDeleted { id: String },
}

impl DomainEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            DomainEvent::NodeCreated { .. } => "node:created",
            DomainEvent::NodeUpdated { .. } => "node:updated",
            DomainEvent::NodeDeleted { .. } => "node:deleted",
        }
    }

    /// Id of the node the event is about
    pub fn node_id(&self) -> &str {
        match self {
            DomainEvent::NodeCreated { id }
            | DomainEvent::NodeUpdated { id, .. }
            | DomainEvent::NodeDeleted { id } => id,
        }
    }
}
