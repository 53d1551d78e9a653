//! Value accessors
//!
//! An accessor moves one scalar in and out of an element. Which accessor an
//! element gets depends only on its tag name; unregistered tags use the
//! fallback.

use std::collections::HashMap;

use valet_dom::{DomResult, DomTree, NodeId};

/// Read/write strategy for one element category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// Text content of the element
    TextContent,
    /// A named attribute
    Attribute(String),
    /// The `value` property
    ValueProperty,
    /// Value property, then `value` attribute, then text content
    Fallback,
}

impl Accessor {
    pub fn attribute(name: &str) -> Self {
        Self::Attribute(name.to_string())
    }

    /// Read the scalar shown by `node`
    pub fn read(&self, tree: &DomTree, node: NodeId) -> Option<String> {
        match self {
            Self::TextContent => non_empty(tree.text_content(node)),
            Self::Attribute(name) => tree.get_attribute(node, name).map(str::to_string),
            Self::ValueProperty => tree.value(node),
            Self::Fallback => tree
                .value(node)
                .and_then(non_empty)
                .or_else(|| {
                    tree.get_attribute(node, "value")
                        .filter(|v| !v.is_empty())
                        .map(str::to_string)
                })
                .or_else(|| non_empty(tree.text_content(node))),
        }
    }

    /// Write `value` into `node`; `None` clears it to the empty string
    pub fn write(&self, tree: &mut DomTree, node: NodeId, value: Option<&str>) -> DomResult<()> {
        let value = value.unwrap_or_default();
        match self {
            Self::TextContent => tree.set_text_content(node, value),
            Self::Attribute(name) => tree.set_attribute(node, name, value),
            Self::ValueProperty => tree.set_value(node, value),
            Self::Fallback => {
                tree.set_value(node, value)?;
                tree.set_text_content(node, value)
            }
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|v| !v.is_empty())
}

/// Tag name to accessor mapping
#[derive(Debug, Clone)]
pub struct AccessorRegistry {
    by_tag: HashMap<String, Accessor>,
    fallback: Accessor,
}

impl AccessorRegistry {
    /// Registry with no tag mappings
    pub fn empty() -> Self {
        Self {
            by_tag: HashMap::new(),
            fallback: Accessor::Fallback,
        }
    }

    /// Registry with the built-in HTML mappings
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(["a", "area", "link"], Accessor::attribute("href"));
        registry.register(["time"], Accessor::attribute("datetime"));
        registry.register(["meta"], Accessor::attribute("content"));
        registry.register(
            ["input", "textarea", "select", "data", "meter", "output", "progress", "attr"],
            Accessor::ValueProperty,
        );
        registry.register(
            ["img", "audio", "embed", "iframe", "source", "track", "video"],
            Accessor::attribute("src"),
        );
        registry.register(["object"], Accessor::attribute("data"));
        registry
    }

    /// Map tags to an accessor, replacing earlier mappings
    pub fn register<I, S>(&mut self, tag_names: I, accessor: Accessor)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tag_names {
            let tag = tag.as_ref().to_ascii_lowercase();
            tracing::trace!("accessor for <{}>: {:?}", tag, accessor);
            self.by_tag.insert(tag, accessor.clone());
        }
    }

    /// Accessor for a tag name
    pub fn lookup(&self, tag: &str) -> &Accessor {
        self.by_tag
            .get(tag)
            .or_else(|| self.by_tag.get(&tag.to_ascii_lowercase()))
            .unwrap_or(&self.fallback)
    }

    fn accessor_for(&self, tree: &DomTree, node: NodeId) -> &Accessor {
        tree.tag_name(node)
            .map_or(&self.fallback, |tag| self.lookup(tag))
    }

    /// Read through the accessor registered for the node's tag
    pub fn read(&self, tree: &DomTree, node: NodeId) -> Option<String> {
        self.accessor_for(tree, node).read(tree, node)
    }

    /// Write through the accessor registered for the node's tag
    pub fn write(&self, tree: &mut DomTree, node: NodeId, value: Option<&str>) -> DomResult<()> {
        self.accessor_for(tree, node).write(tree, node, value)
    }
}

impl Default for AccessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
