//! DOM Events
//!
//! Listener registry and propagation paths. Dispatch does not run code: it
//! returns the ordered list of listeners an event reaches, and the owner of
//! the listeners acts on it in the same turn.

use std::collections::HashMap;

use crate::{DomTree, NodeData, NodeId};

/// Event listener identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// DOM event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub event_type: String,
    pub target: NodeId,
    /// Propagates to ancestors after the target
    pub bubbles: bool,
    /// Crosses shadow root boundaries into the host's tree
    pub composed: bool,
}

impl DomEvent {
    /// Non-bubbling event
    pub fn new(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            bubbles: false,
            composed: false,
        }
    }

    /// Event that bubbles and crosses shadow boundaries
    pub fn composed(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            bubbles: true,
            composed: true,
        }
    }

    /// Set whether the event bubbles
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }
}

impl DomTree {
    /// Nodes an event visits, target first
    ///
    /// A composed event leaving a shadow tree continues at the host element;
    /// otherwise it stops at the shadow root.
    pub fn propagation_path(&self, event: &DomEvent) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = event.target;
        while let Some(node) = self.get(current) {
            path.push(current);
            if !event.bubbles {
                break;
            }
            current = match &node.data {
                NodeData::ShadowRoot(shadow) if event.composed => shadow.host,
                _ => node.parent,
            };
        }
        path
    }
}

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    event_type: String,
}

/// Listeners by target node
#[derive(Debug, Default)]
pub struct EventListeners {
    next_id: u64,
    by_node: HashMap<NodeId, Vec<Listener>>,
    node_of: HashMap<ListenerId, NodeId>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event_type` on `node`
    pub fn add_listener(&mut self, node: NodeId, event_type: &str) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.by_node.entry(node).or_default().push(Listener {
            id,
            event_type: event_type.to_string(),
        });
        self.node_of.insert(id, node);
        id
    }

    /// Remove a listener; false if it was not registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let Some(node) = self.node_of.remove(&id) else {
            return false;
        };
        if let Some(listeners) = self.by_node.get_mut(&node) {
            listeners.retain(|l| l.id != id);
            if listeners.is_empty() {
                self.by_node.remove(&node);
            }
        }
        true
    }

    /// Node a listener is registered on
    pub fn target_of(&self, id: ListenerId) -> Option<NodeId> {
        self.node_of.get(&id).copied()
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.node_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_of.is_empty()
    }

    /// Listeners reached by `event`, in delivery order
    ///
    /// Nodes are visited along the propagation path; listeners on one node
    /// are delivered in registration order.
    pub fn dispatch(&self, tree: &DomTree, event: &DomEvent) -> Vec<ListenerId> {
        let mut reached = Vec::new();
        for node in tree.propagation_path(event) {
            let Some(listeners) = self.by_node.get(&node) else {
                continue;
            };
            reached.extend(
                listeners
                    .iter()
                    .filter(|l| l.event_type == event.event_type)
                    .map(|l| l.id),
            );
        }
        tracing::trace!(
            "dispatch {} from {} reached {} listener(s)",
            event.event_type,
            event.target,
            reached.len()
        );
        reached
    }
}
