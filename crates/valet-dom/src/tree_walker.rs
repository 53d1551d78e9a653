//! TreeWalker
//!
//! Filtered pre-order traversal of a subtree. The filter decides per node
//! whether it is yielded and whether its children are visited, which is
//! enough to express boundary-stopping scans.

use crate::{DomTree, Node, NodeId};

/// Node filter result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// Yield the node and visit its children
    Accept,
    /// Skip the node but visit its children
    Skip,
    /// Skip the node and its whole subtree
    Reject,
    /// Yield the node but do not visit its children
    Boundary,
}

impl FilterResult {
    #[inline]
    fn yields(self) -> bool {
        matches!(self, Self::Accept | Self::Boundary)
    }

    #[inline]
    fn descends(self) -> bool {
        matches!(self, Self::Accept | Self::Skip)
    }
}

/// TreeWalker over the descendants of `root` in document order
///
/// The root itself is never passed to the filter. Shadow trees are not
/// entered since shadow roots are not linked as children.
pub struct TreeWalker<'a, F> {
    tree: &'a DomTree,
    /// Pending nodes, next one on top
    stack: Vec<NodeId>,
    filter: F,
}

impl<'a, F> TreeWalker<'a, F>
where
    F: FnMut(NodeId, &Node) -> FilterResult,
{
    /// Create a new TreeWalker
    pub fn new(tree: &'a DomTree, root: NodeId, filter: F) -> Self {
        let mut walker = Self {
            tree,
            stack: Vec::new(),
            filter,
        };
        walker.push_children(root);
        walker
    }

    fn push_children(&mut self, parent: NodeId) {
        let start = self.stack.len();
        self.stack
            .extend(self.tree.children(parent).map(|(id, _)| id));
        self.stack[start..].reverse();
    }
}

impl<F> Iterator for TreeWalker<'_, F>
where
    F: FnMut(NodeId, &Node) -> FilterResult,
{
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let result = (self.filter)(id, node);
            if result.descends() {
                self.push_children(id);
            }
            if result.yields() {
                return Some(id);
            }
        }
        None
    }
}

impl DomTree {
    /// All descendants of `root` in document order
    pub fn descendants(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        TreeWalker::new(self, root, |_, _| FilterResult::Accept)
    }

    /// Element descendants of `root` in document order
    pub fn descendant_elements(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        TreeWalker::new(self, root, |_, node| {
            if node.is_element() {
                FilterResult::Accept
            } else {
                FilterResult::Skip
            }
        })
    }
}
