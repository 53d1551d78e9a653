//! Shadow DOM
//!
//! A shadow root is an unparented node that records its host. Walking up
//! from any node inside the shadow tree ends at the shadow root, which is how
//! a node finds the element hosting it.

use crate::{DomError, DomResult, DomTree, Node, NodeData, NodeId};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

impl ShadowRootMode {
    /// Parse a `shadowrootmode` attribute value
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Shadow root
#[derive(Debug, Clone)]
pub struct ShadowRootData {
    pub host: NodeId,
    pub mode: ShadowRootMode,
}

impl DomTree {
    /// Attach a shadow root to an element
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> DomResult<NodeId> {
        let element = self.element(host).ok_or_else(|| match self.get(host) {
            Some(_) => DomError::NotAnElement(host),
            None => DomError::NotFound(host),
        })?;
        if element.shadow_root.is_valid() {
            return Err(DomError::ShadowRootExists(host));
        }

        let shadow = self.push(Node::shadow_root(ShadowRootData { host, mode }));
        if let Some(element) = self.element_mut(host) {
            element.shadow_root = shadow;
        }
        tracing::trace!("attached {:?} shadow root {} to {}", mode, shadow, host);
        Ok(shadow)
    }

    /// Shadow root hosted by an element
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.element(host)
            .map(|e| e.shadow_root)
            .filter(|id| id.is_valid())
    }

    /// Topmost ancestor of a node (the node itself if unparented)
    pub fn root_node(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Host of the shadow tree containing `id`, if any
    pub fn shadow_host(&self, id: NodeId) -> Option<NodeId> {
        match &self.get(self.root_node(id))?.data {
            NodeData::ShadowRoot(shadow) => Some(shadow.host),
            _ => None,
        }
    }
}
