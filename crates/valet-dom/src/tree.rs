//! DOM Tree (arena-based allocation)

use crate::{DomError, DomResult, Node, NodeData, NodeId, ElementData};

/// Arena-based DOM tree
///
/// Index 0 is always the document node. Nodes are appended to the arena and
/// never removed; `detach` only unlinks them.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a detached node to the arena
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(parent)?;
        let child_node = self.node(child)?;
        if matches!(child_node.data, NodeData::Document | NodeData::ShadowRoot(_))
            || self.is_inclusive_ancestor(child, parent)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Unlink a node from its parent and siblings
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Iterate over the children of a node
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(parent).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Iterate over the ancestors of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.parent),
        }
    }

    /// Structural parent
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Element data for an element node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data for an element node
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    fn element_mut_or_err(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        match self.get_mut(id) {
            Some(node) => node.as_element_mut().ok_or(DomError::NotAnElement(id)),
            None => Err(DomError::NotFound(id)),
        }
    }

    /// Lowercased tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag_name)
    }

    /// Attribute value of an element
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attr(name))
    }

    /// Whether an element carries an attribute
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut_or_err(id)?.set_attr(name, value);
        Ok(())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(&text.content),
            Some(NodeData::Comment(content)) => out.push_str(content),
            Some(_) => self.collect_text(id, &mut out),
            None => {}
        }
        out
    }

    fn collect_text(&self, parent: NodeId, out: &mut String) {
        for (child_id, child) in self.children(parent) {
            match &child.data {
                NodeData::Text(text) => out.push_str(&text.content),
                NodeData::Element(_) => self.collect_text(child_id, out),
                _ => {}
            }
        }
    }

    /// Replace all children with a single text node (none if `text` is empty)
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::NotFound(id))?;
        match &mut node.data {
            NodeData::Text(data) => {
                data.content = text.to_string();
                return Ok(());
            }
            NodeData::Comment(content) => {
                *content = text.to_string();
                return Ok(());
            }
            NodeData::Doctype { .. } => return Ok(()),
            _ => {}
        }

        let mut children: Vec<NodeId> = self.children(id).map(|(child, _)| child).collect();

        // A leading text child is rewritten in place so repeated writes stay
        // within the arena
        let reused = match children.first().and_then(|&first| self.get_mut(first)) {
            Some(Node { data: NodeData::Text(data), .. }) if !text.is_empty() => {
                data.content = text.to_string();
                true
            }
            _ => false,
        };
        if reused {
            children.remove(0);
        }
        for child in children {
            self.detach(child);
        }
        if !text.is_empty() && !reused {
            let text_node = self.create_text(text);
            self.append_child(id, text_node)?;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Iterator over the ancestors of a node
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.parent;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");
        let text = tree.create_text("Hello");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();
        tree.append_child(span, text).unwrap();
        (tree, div, span, text)
    }

    #[test]
    fn test_append_links_siblings() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        tree.append_child(ul, a).unwrap();
        tree.append_child(ul, b).unwrap();

        let ids: Vec<NodeId> = tree.children(ul).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(tree.get(a).unwrap().next_sibling, b);
        assert_eq!(tree.get(b).unwrap().prev_sibling, a);
        assert_eq!(tree.get(ul).unwrap().last_child, b);
    }

    #[test]
    fn test_append_moves_node() {
        let (mut tree, div, span, _) = sample();
        let other = tree.create_element("p");
        tree.append_child(div, other).unwrap();
        tree.append_child(other, span).unwrap();

        let ids: Vec<NodeId> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![other]);
        assert_eq!(tree.parent(span), Some(other));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (mut tree, div, span, _) = sample();
        assert_eq!(
            tree.append_child(span, div),
            Err(DomError::HierarchyRequest { parent: span, child: div })
        );
    }

    #[test]
    fn test_text_content() {
        let (tree, div, _, _) = sample();
        assert_eq!(tree.text_content(div), "Hello");
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let (mut tree, div, span, _) = sample();
        tree.set_text_content(div, "Bye").unwrap();

        assert_eq!(tree.text_content(div), "Bye");
        assert_eq!(tree.parent(span), None);

        tree.set_text_content(div, "").unwrap();
        assert_eq!(tree.children(div).count(), 0);
    }

    #[test]
    fn test_set_text_content_reuses_text_node() {
        let (mut tree, _, span, text) = sample();
        let before = tree.len();

        for n in 0..100 {
            tree.set_text_content(span, &format!("v{n}")).unwrap();
        }
        assert_eq!(tree.len(), before);
        assert_eq!(tree.children(span).map(|(id, _)| id).collect::<Vec<_>>(), vec![text]);
        assert_eq!(tree.text_content(span), "v99");
    }

    #[test]
    fn test_attributes_require_element() {
        let (mut tree, _, span, text) = sample();
        tree.set_attribute(span, "itemprop", "name").unwrap();

        assert_eq!(tree.get_attribute(span, "itemprop"), Some("name"));
        assert_eq!(
            tree.set_attribute(text, "itemprop", "name"),
            Err(DomError::NotAnElement(text))
        );
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (tree, div, span, text) = sample();
        let chain: Vec<NodeId> = tree.ancestors(text).collect();
        assert_eq!(chain, vec![span, div, tree.root()]);
    }
}
