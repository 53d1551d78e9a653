//! Scope binding engine
//!
//! An engine is attached to a host element. It resolves a root from a
//! [`RootTarget`], indexes the scopes under that root by their `itemid`, and
//! keeps a record cache that `get`/`set` work against. Writes for ids with a
//! live scope also reach the document.

use std::collections::HashMap;

use valet_dom::{Document, NodeId};

use crate::{
    AccessorRegistry, BindConfig, BindError, CacheMode, ItemUpdate, Record, RootTarget,
    SubscriptionId, TreeScanner, UpdateChannel, read_scope, write_scope,
};

/// Binds the records of one root region to a cache
#[derive(Debug)]
pub struct ScopeBindingEngine {
    host: NodeId,
    target: RootTarget,
    root: NodeId,
    /// id -> scope element; the later scope wins on duplicate ids
    scopes: HashMap<String, NodeId>,
    /// Indexed ids in traversal order of their first scope
    order: Vec<String>,
    cache: HashMap<String, Record>,
    accessors: AccessorRegistry,
    config: BindConfig,
    subscription: Option<SubscriptionId>,
}

impl ScopeBindingEngine {
    /// Create an engine rooted at its own host
    ///
    /// Nothing is indexed and no subscription exists until [`connect`] or
    /// [`bind`] is called.
    ///
    /// [`connect`]: Self::connect
    /// [`bind`]: Self::bind
    pub fn new(host: NodeId, config: BindConfig) -> Self {
        Self {
            host,
            target: RootTarget::Host,
            root: host,
            scopes: HashMap::new(),
            order: Vec::new(),
            cache: HashMap::new(),
            accessors: AccessorRegistry::new(),
            config,
            subscription: None,
        }
    }

    /// Replace the accessor registry
    pub fn with_accessors(mut self, accessors: AccessorRegistry) -> Self {
        self.accessors = accessors;
        self
    }

    /// Bind to the host itself
    pub fn connect(&mut self, document: &Document, channel: &mut UpdateChannel) {
        self.target = RootTarget::Host;
        self.root = self.host;
        self.refresh(document);
        self.resubscribe(channel);
    }

    /// Resolve `target`, rebind to it and refresh
    ///
    /// When the target cannot be resolved the engine binds to its host,
    /// refreshes and subscribes there, and then reports the error.
    pub fn bind(
        &mut self,
        document: &Document,
        channel: &mut UpdateChannel,
        target: &str,
    ) -> Result<NodeId, BindError> {
        let target = RootTarget::parse(target);
        let resolved = target.resolve(document, self.host);

        match &resolved {
            Ok(root) => {
                self.target = target;
                self.root = *root;
            }
            Err(err) => {
                tracing::warn!("{}; engine on {} falls back to its host", err, self.host);
                self.target = RootTarget::Host;
                self.root = self.host;
            }
        }

        self.refresh(document);
        self.resubscribe(channel);
        resolved
    }

    /// Rebuild the scope index, and in read-write mode the cache
    pub fn refresh(&mut self, document: &Document) {
        let tree = document.tree();
        let markers = &self.config.markers;

        self.scopes.clear();
        self.order.clear();
        for scope in TreeScanner::new(markers).scopes(tree, self.root) {
            let Some(id) = tree.get_attribute(scope, &markers.id).filter(|id| !id.is_empty()) else {
                continue;
            };
            if self.scopes.insert(id.to_string(), scope).is_none() {
                self.order.push(id.to_string());
            }
        }

        if self.config.cache_mode == CacheMode::ReadWrite {
            self.cache = self
                .scopes
                .iter()
                .map(|(id, &scope)| {
                    (id.clone(), read_scope(tree, scope, &self.config, &self.accessors))
                })
                .collect();
        }

        tracing::debug!(
            "refreshed {} (root {}): {} scope(s), {} cached record(s)",
            self.host,
            self.root,
            self.scopes.len(),
            self.cache.len()
        );
    }

    /// Cached record for `id`
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.cache.get(id)
    }

    /// Cache `record` under `id` and write it into the scope indexed there
    ///
    /// An id with no scope is only cached.
    pub fn set(&mut self, document: &mut Document, id: &str, record: Record) {
        match self.scopes.get(id) {
            Some(&scope) => {
                let written = write_scope(
                    document.tree_mut(),
                    scope,
                    &record,
                    &self.config,
                    &self.accessors,
                );
                if let Err(err) = written {
                    tracing::warn!("writing {} into scope {} failed: {}", id, scope, err);
                }
                tracing::trace!("set {} -> scope {}", id, scope);
            }
            None => tracing::trace!("set {} (no scope, cached only)", id),
        }
        self.cache.insert(id.to_string(), record);
    }

    /// Fold an update from the channel into the engine
    pub fn on_update_event(&mut self, document: &mut Document, update: ItemUpdate) {
        tracing::trace!("update for {} delivered to {}", update.item_id, self.host);
        self.set(document, &update.item_id, update.record);
    }

    /// Drop the channel subscription
    pub fn detach(&mut self, channel: &mut UpdateChannel) {
        if let Some(subscription) = self.subscription.take() {
            channel.unsubscribe(subscription);
        }
    }

    /// Keep exactly one subscription, on the current root
    fn resubscribe(&mut self, channel: &mut UpdateChannel) {
        if let Some(subscription) = self.subscription {
            if channel.root_of(subscription) == Some(self.root) {
                return;
            }
            channel.unsubscribe(subscription);
        }
        self.subscription = Some(channel.subscribe(self.root));
    }

    /// Scope element indexed under `id`
    pub fn scope(&self, id: &str) -> Option<NodeId> {
        self.scopes.get(id).copied()
    }

    /// Indexed ids, in traversal order
    pub fn scope_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.cache.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn target(&self) -> &RootTarget {
        &self.target
    }

    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    pub fn accessors(&self) -> &AccessorRegistry {
        &self.accessors
    }

    /// Registry to extend with host-specific accessors
    pub fn accessors_mut(&mut self) -> &mut AccessorRegistry {
        &mut self.accessors
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valet_html::parse;

    const PEOPLE: &str = r#"
        <div id="list">
          <activity-sub id="sub"></activity-sub>
          <div itemscope itemid="p1"><span itemprop="name">Alice</span></div>
          <div itemscope itemid="p2"><span itemprop="name">Carol</span></div>
          <div itemscope><span itemprop="name">Nobody</span></div>
        </div>"#;

    fn attached(doc: &Document, channel: &mut UpdateChannel, config: BindConfig) -> ScopeBindingEngine {
        let host = doc.get_element_by_id("sub").unwrap();
        let mut engine = ScopeBindingEngine::new(host, config);
        engine.bind(doc, channel, "@parent").unwrap();
        engine
    }

    #[test]
    fn test_new_engine_is_unbound() {
        let doc = parse(PEOPLE).unwrap();
        let host = doc.get_element_by_id("sub").unwrap();
        let engine = ScopeBindingEngine::new(host, BindConfig::default());

        assert_eq!(engine.root(), host);
        assert_eq!(engine.subscription(), None);
        assert_eq!(engine.scope_ids().count(), 0);
    }

    #[test]
    fn test_refresh_indexes_identified_scopes() {
        let doc = parse(PEOPLE).unwrap();
        let mut channel = UpdateChannel::new();
        let engine = attached(&doc, &mut channel, BindConfig::default());

        assert_eq!(engine.scope_ids().collect::<Vec<_>>(), vec!["p1", "p2"]);
        assert_eq!(engine.get("p2").and_then(|r| r.first("name")), Some("Carol"));
        assert_eq!(engine.records().count(), 2);
    }

    #[test]
    fn test_set_writes_and_caches() {
        let mut doc = parse(PEOPLE).unwrap();
        let mut channel = UpdateChannel::new();
        let mut engine = attached(&doc, &mut channel, BindConfig::default());

        let record = Record::new().with("name", "Bob");
        engine.set(&mut doc, "p1", record.clone());

        let scope = engine.scope("p1").unwrap();
        assert_eq!(doc.tree().text_content(scope), "Bob");
        assert_eq!(engine.get("p1"), Some(&record));
    }

    #[test]
    fn test_set_unknown_id_only_caches() {
        let mut doc = parse(PEOPLE).unwrap();
        let before = valet_html::HtmlSerializer::new().serialize_inner(doc.tree(), doc.tree().root());
        let mut channel = UpdateChannel::new();
        let mut engine = attached(&doc, &mut channel, BindConfig::default());

        engine.set(&mut doc, "ghost", Record::new().with("name", "Boo"));

        let after = valet_html::HtmlSerializer::new().serialize_inner(doc.tree(), doc.tree().root());
        assert_eq!(before, after);
        assert_eq!(engine.get("ghost").and_then(|r| r.first("name")), Some("Boo"));
    }

    #[test]
    fn test_rebind_moves_subscription() {
        let doc = parse(PEOPLE).unwrap();
        let mut channel = UpdateChannel::new();
        let mut engine = attached(&doc, &mut channel, BindConfig::default());
        let list = doc.get_element_by_id("list").unwrap();

        let first = engine.subscription().unwrap();
        assert_eq!(channel.root_of(first), Some(list));

        // Same root: the subscription is kept.
        engine.bind(&doc, &mut channel, "list").unwrap();
        assert_eq!(engine.subscription(), Some(first));

        engine.bind(&doc, &mut channel, "").unwrap();
        assert_eq!(channel.len(), 1);
        assert_eq!(channel.root_of(engine.subscription().unwrap()), Some(engine.host()));
    }

    #[test]
    fn test_failed_bind_falls_back_to_host() {
        let doc = parse(PEOPLE).unwrap();
        let mut channel = UpdateChannel::new();
        let mut engine = attached(&doc, &mut channel, BindConfig::default());

        let err = engine.bind(&doc, &mut channel, "missing-id").unwrap_err();
        assert_eq!(
            err,
            BindError::Resolution {
                target: "missing-id".to_string()
            }
        );
        assert_eq!(engine.root(), engine.host());
        assert_eq!(engine.target(), &RootTarget::Host);
        assert_eq!(engine.scope_ids().count(), 0);
        assert_eq!(channel.root_of(engine.subscription().unwrap()), Some(engine.host()));
    }

    #[test]
    fn test_detach() {
        let doc = parse(PEOPLE).unwrap();
        let mut channel = UpdateChannel::new();
        let mut engine = attached(&doc, &mut channel, BindConfig::default());

        engine.detach(&mut channel);
        assert!(channel.is_empty());
        assert_eq!(engine.subscription(), None);
    }
}
