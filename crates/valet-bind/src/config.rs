//! Binding configuration

use serde::{Deserialize, Serialize};
use valet_dom::ElementData;

/// How the record cache is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    /// Every refresh re-reads all indexed scopes into a fresh cache
    #[default]
    ReadWrite,
    /// The cache only holds values passed to `set`; refresh leaves it alone
    WriteOnly,
}

/// How a value reaches several property elements sharing one name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteDistribution {
    /// Each element receives the whole value; sequences are joined with `,`
    #[default]
    Broadcast,
    /// The k-th element receives the k-th value; surplus elements are cleared
    Positional,
}

/// Attribute names that mark scopes and properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerNames {
    /// Scope boundary
    pub scope: String,
    /// Field name of a property element
    pub property: String,
    /// Secondary property marker, consulted when `property` is absent
    pub alt_property: String,
    /// Record identity (`@id`)
    pub id: String,
    /// Record type (`@type`)
    #[serde(rename = "type")]
    pub type_name: String,
}

impl MarkerNames {
    /// Whether an element delimits a scope
    #[inline]
    pub fn is_scope(&self, element: &ElementData) -> bool {
        element.has_attr(&self.scope)
    }

    /// Field name of a property element
    pub fn property_name<'e>(&self, element: &'e ElementData) -> Option<&'e str> {
        element
            .get_attr(&self.property)
            .or_else(|| element.get_attr(&self.alt_property))
    }
}

impl Default for MarkerNames {
    fn default() -> Self {
        Self {
            scope: "itemscope".to_string(),
            property: "itemprop".to_string(),
            alt_property: "takeprop".to_string(),
            id: "itemid".to_string(),
            type_name: "itemtype".to_string(),
        }
    }
}

/// Engine configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    pub cache_mode: CacheMode,
    pub distribution: WriteDistribution,
    /// Copy `@id`/`@type` of written records onto the scope element
    pub sync_identity: bool,
    pub markers: MarkerNames,
}

impl BindConfig {
    /// Lazily populated cache
    pub fn write_only() -> Self {
        Self {
            cache_mode: CacheMode::WriteOnly,
            ..Self::default()
        }
    }

    /// Load from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            cache_mode: CacheMode::ReadWrite,
            distribution: WriteDistribution::Broadcast,
            sync_identity: true,
            markers: MarkerNames::default(),
        }
    }
}
