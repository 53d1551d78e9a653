//! Valet DOM - Document Object Model
//!
//! Arena-backed element tree that the binding engine reads from and writes
//! into. Nodes are addressed by [`NodeId`] and never freed; detached nodes
//! simply stop being reachable from the document.

mod node;
mod tree;
mod document;
mod error;
mod forms;
mod shadow;
mod tree_walker;
mod dom_events;

pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::{Ancestors, Children, DomTree};
pub use document::Document;
pub use error::{DomError, DomResult};
pub use shadow::{ShadowRootData, ShadowRootMode};
pub use tree_walker::{FilterResult, TreeWalker};
pub use dom_events::{DomEvent, EventListeners, ListenerId};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for a missing link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the `NONE` sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
