//! Binding target resolution

use std::fmt;

use valet_dom::{Document, NodeId};

use crate::BindError;

/// What an engine binds against, relative to its host element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RootTarget {
    /// The host element itself (`""`)
    #[default]
    Host,
    /// The host's parent element (`@parent`)
    Parent,
    /// The shadow host containing the host, else the body (`@root`)
    Root,
    /// The element with this `id`
    Id(String),
}

impl RootTarget {
    /// Parse a binding target string
    pub fn parse(value: &str) -> Self {
        match value {
            "" => Self::Host,
            "@parent" => Self::Parent,
            "@root" => Self::Root,
            id => Self::Id(id.to_string()),
        }
    }

    /// Resolve to a live element
    pub fn resolve(&self, document: &Document, host: NodeId) -> Result<NodeId, BindError> {
        let tree = document.tree();
        let resolved = match self {
            Self::Host => Some(host),
            Self::Parent => tree.parent(host).filter(|&p| tree.element(p).is_some()),
            Self::Root => tree.shadow_host(host).or_else(|| document.body()),
            Self::Id(id) => document.get_element_by_id(id),
        };
        resolved.ok_or_else(|| BindError::Resolution {
            target: self.to_string(),
        })
    }
}

impl From<&str> for RootTarget {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for RootTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => f.write_str(""),
            Self::Parent => f.write_str("@parent"),
            Self::Root => f.write_str("@root"),
            Self::Id(id) => f.write_str(id),
        }
    }
}
