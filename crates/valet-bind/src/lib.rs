//! Valet Bind - scope-based data binding
//!
//! Regions of a document marked with `itemscope` are bound to records keyed
//! by their `itemid`. Elements marked with `itemprop` (or `takeprop`) inside a
//! scope hold the record's fields; an [`AccessorRegistry`] decides how each
//! element's value is read and written.
//!
//! # Example
//! ```rust,ignore
//! use valet_bind::{BindConfig, Page, Record};
//!
//! let mut page = Page::new(valet_html::parse(html)?);
//! let engine = page.attach(host, BindConfig::default());
//! page.bind(engine, "@parent")?;
//! page.set(engine, "p1", Record::new().with("name", "Bob"))?;
//! ```

mod accessor;
mod binding;
mod channel;
mod config;
mod engine;
mod error;
mod page;
mod record;
mod resolve;
mod scanner;

pub use accessor::{Accessor, AccessorRegistry};
pub use binding::{read_scope, write_scope};
pub use channel::{ITEM_UPDATE, ItemUpdate, SubscriptionId, UpdateChannel};
pub use config::{BindConfig, CacheMode, MarkerNames, WriteDistribution};
pub use engine::ScopeBindingEngine;
pub use error::BindError;
pub use page::{EngineId, Page};
pub use record::{FieldValue, ID_FIELD, Record, TYPE_FIELD};
pub use resolve::RootTarget;
pub use scanner::TreeScanner;

// Re-export the document crate for callers that only depend on this one
pub use valet_dom as dom;
