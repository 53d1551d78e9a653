//! Item update channel
//!
//! Any node may raise an [`ItemUpdate`]; it travels from the origin through
//! its ancestors (crossing shadow boundaries) and reaches every subscription
//! registered on that path, nearest first.

use serde::{Deserialize, Serialize};
use valet_dom::{DomEvent, DomTree, EventListeners, ListenerId, NodeId};

use crate::Record;

/// Event type carried on the channel
pub const ITEM_UPDATE: &str = "item-update";

/// Subscription handle
pub type SubscriptionId = ListenerId;

/// New value for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub item_id: String,
    pub record: Record,
}

impl ItemUpdate {
    pub fn new(item_id: impl Into<String>, record: Record) -> Self {
        Self {
            item_id: item_id.into(),
            record,
        }
    }
}

/// Subscriptions to item updates, keyed by the node they listen on
#[derive(Debug, Default)]
pub struct UpdateChannel {
    listeners: EventListeners,
}

impl UpdateChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for updates raised at or below `root`
    pub fn subscribe(&mut self, root: NodeId) -> SubscriptionId {
        self.listeners.add_listener(root, ITEM_UPDATE)
    }

    /// Stop listening; false if already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove_listener(id)
    }

    /// Node a subscription listens on
    pub fn root_of(&self, id: SubscriptionId) -> Option<NodeId> {
        self.listeners.target_of(id)
    }

    /// Subscriptions an update raised at `origin` reaches, in delivery order
    pub fn route(&self, tree: &DomTree, origin: NodeId) -> Vec<SubscriptionId> {
        self.listeners
            .dispatch(tree, &DomEvent::composed(ITEM_UPDATE, origin))
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
