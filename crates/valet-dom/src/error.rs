//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node id does not address a node in this tree
    #[error("node {0} not found")]
    NotFound(NodeId),

    /// Insertion would create a cycle or move a root node
    #[error("hierarchy request error: cannot insert {child} under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// Operation requires an element
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// Element already hosts a shadow root
    #[error("element {0} already hosts a shadow root")]
    ShadowRootExists(NodeId),
}
