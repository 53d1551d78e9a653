//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to a `valet-dom` document.
//! Declarative shadow roots (`<template shadowrootmode>`) are attached to
//! their parent element instead of being kept as inert templates.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use valet_dom::{Document, DomTree, Node, NodeData, NodeId, ShadowRootMode};

use crate::HtmlError;

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root)?;
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> Result<(), HtmlError> {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
            }
            RcNodeData::Doctype { name, public_id, system_id } => {
                let id = tree.push(Node::doctype(
                    name.to_string(),
                    public_id.to_string(),
                    system_id.to_string(),
                ));
                tree.append_child(parent, id)?;
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() && !keeps_whitespace(tree, parent) {
                    return Ok(());
                }
                let id = tree.create_text(&text);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, template_contents, .. } => {
                let shadow_mode = if &*name.local == "template" {
                    attrs
                        .borrow()
                        .iter()
                        .find(|attr| &*attr.name.local == "shadowrootmode")
                        .and_then(|attr| ShadowRootMode::parse(&attr.value))
                } else {
                    None
                };

                if let Some(mode) = shadow_mode {
                    if tree.element(parent).is_some() && tree.shadow_root(parent).is_none() {
                        let shadow = tree.attach_shadow(parent, mode)?;
                        if let Some(contents) = template_contents.borrow().as_ref() {
                            for child in contents.children.borrow().iter() {
                                self.convert_node(child, tree, shadow)?;
                            }
                        }
                        return Ok(());
                    }
                }

                let id = tree.create_element(&name.local);
                if let Some(element) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        element.set_attr(&attr.name.local, attr.value.to_string());
                    }
                }
                tree.append_child(parent, id)?;

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id)?;
                }
                // Inert template content is kept as ordinary children
                if let Some(contents) = template_contents.borrow().as_ref() {
                    for child in contents.children.borrow().iter() {
                        self.convert_node(child, tree, id)?;
                    }
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {
                // Not meaningful in HTML documents
            }
        }
        Ok(())
    }
}

/// Whitespace-only text is content everywhere but between document-level tags
fn keeps_whitespace(tree: &DomTree, parent: NodeId) -> bool {
    match tree.get(parent).map(|node| &node.data) {
        Some(NodeData::Document) => false,
        Some(NodeData::Element(element)) => !matches!(element.tag_name(), "html" | "head"),
        _ => true,
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
