//! Page - a document together with its binding engines
//!
//! The page owns the document, the update channel and every engine attached
//! to it, so an update raised anywhere in the document can be routed to the
//! engines subscribed above it within one call.

use std::fmt;

use valet_dom::{Document, NodeId};

use crate::{BindConfig, BindError, ItemUpdate, Record, ScopeBindingEngine, UpdateChannel};

/// Handle to an engine attached to a [`Page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineId(pub usize);

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine#{}", self.0)
    }
}

/// A bound document
#[derive(Debug)]
pub struct Page {
    document: Document,
    channel: UpdateChannel,
    engines: Vec<Option<ScopeBindingEngine>>,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            channel: UpdateChannel::new(),
            engines: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct document access; call [`refresh`](Self::refresh) after structural edits
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn channel(&self) -> &UpdateChannel {
        &self.channel
    }

    /// Attach an engine to `host`, bound to the host itself
    pub fn attach(&mut self, host: NodeId, config: BindConfig) -> EngineId {
        self.attach_engine(ScopeBindingEngine::new(host, config))
    }

    /// Attach a preconfigured engine
    pub fn attach_engine(&mut self, mut engine: ScopeBindingEngine) -> EngineId {
        engine.connect(&self.document, &mut self.channel);
        let id = EngineId(self.engines.len());
        tracing::debug!("attached {} on {}", id, engine.host());
        self.engines.push(Some(engine));
        id
    }

    /// Remove an engine and its subscription
    pub fn detach(&mut self, id: EngineId) -> Result<ScopeBindingEngine, BindError> {
        let mut engine = self
            .engines
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(BindError::UnknownEngine(id))?;
        engine.detach(&mut self.channel);
        Ok(engine)
    }

    pub fn engine(&self, id: EngineId) -> Result<&ScopeBindingEngine, BindError> {
        self.engines
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(BindError::UnknownEngine(id))
    }

    pub fn engine_mut(&mut self, id: EngineId) -> Result<&mut ScopeBindingEngine, BindError> {
        self.engines
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(BindError::UnknownEngine(id))
    }

    /// Rebind an engine, see [`ScopeBindingEngine::bind`]
    pub fn bind(&mut self, id: EngineId, target: &str) -> Result<NodeId, BindError> {
        let Self {
            document,
            channel,
            engines,
        } = self;
        let engine = engines
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(BindError::UnknownEngine(id))?;
        engine.bind(document, channel, target)
    }

    pub fn refresh(&mut self, id: EngineId) -> Result<(), BindError> {
        let Self { document, engines, .. } = self;
        let engine = engines
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(BindError::UnknownEngine(id))?;
        engine.refresh(document);
        Ok(())
    }

    /// Refresh every attached engine
    pub fn refresh_all(&mut self) {
        for engine in self.engines.iter_mut().flatten() {
            engine.refresh(&self.document);
        }
    }

    pub fn get(&self, id: EngineId, item_id: &str) -> Result<Option<&Record>, BindError> {
        Ok(self.engine(id)?.get(item_id))
    }

    pub fn set(&mut self, id: EngineId, item_id: &str, record: Record) -> Result<(), BindError> {
        let Self { document, engines, .. } = self;
        let engine = engines
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(BindError::UnknownEngine(id))?;
        engine.set(document, item_id, record);
        Ok(())
    }

    /// Raise `update` at `origin`
    ///
    /// Every engine subscribed on the path from `origin` upwards receives it,
    /// nearest first. Returns how many engines were reached.
    pub fn dispatch_update(&mut self, origin: NodeId, update: ItemUpdate) -> usize {
        let route = self.channel.route(self.document.tree(), origin);
        let mut delivered = 0;
        for subscription in route {
            let Some(engine) = self
                .engines
                .iter_mut()
                .flatten()
                .find(|engine| engine.subscription() == Some(subscription))
            else {
                continue;
            };
            engine.on_update_event(&mut self.document, update.clone());
            delivered += 1;
        }
        tracing::trace!("update for {} from {} reached {} engine(s)", update.item_id, origin, delivered);
        delivered
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}
