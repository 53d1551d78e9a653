//! Scope and property discovery
//!
//! Both scans are boundary-stopping pre-order walks: a scope element ends the
//! region of the scope (or root) the walk started from. Inert `<template>`
//! content is never scanned.

use valet_dom::{DomTree, ElementData, FilterResult, Node, NodeId, TreeWalker};

use crate::MarkerNames;

/// Finds scope and property elements using a set of marker attributes
#[derive(Debug, Clone, Copy)]
pub struct TreeScanner<'m> {
    markers: &'m MarkerNames,
}

impl<'m> TreeScanner<'m> {
    pub fn new(markers: &'m MarkerNames) -> Self {
        Self { markers }
    }

    /// Outermost scope elements below `root`, in document order
    ///
    /// `root` itself is not considered even when it is a scope.
    pub fn scopes(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        TreeWalker::new(tree, root, |_, node: &Node| match node.as_element() {
            Some(element) if is_inert(element) => FilterResult::Reject,
            Some(element) if self.markers.is_scope(element) => FilterResult::Boundary,
            _ => FilterResult::Skip,
        })
        .collect()
    }

    /// Property elements belonging to `scope`, in document order
    ///
    /// A nested scope that is also a property of `scope` is reported, but
    /// nothing inside a nested scope is.
    pub fn properties(&self, tree: &DomTree, scope: NodeId) -> Vec<NodeId> {
        TreeWalker::new(tree, scope, |_, node: &Node| {
            let Some(element) = node.as_element() else {
                return FilterResult::Skip;
            };
            if is_inert(element) {
                return FilterResult::Reject;
            }
            let is_property = self.markers.property_name(element).is_some();
            match (is_property, self.markers.is_scope(element)) {
                (true, true) => FilterResult::Boundary,
                (true, false) => FilterResult::Accept,
                (false, true) => FilterResult::Reject,
                (false, false) => FilterResult::Skip,
            }
        })
        .collect()
    }

    /// Field name carried by a property element
    pub fn property_name<'t>(&self, tree: &'t DomTree, node: NodeId) -> Option<&'t str> {
        tree.element(node)
            .and_then(|element| self.markers.property_name(element))
    }
}

fn is_inert(element: &ElementData) -> bool {
    element.tag_name() == "template"
}
