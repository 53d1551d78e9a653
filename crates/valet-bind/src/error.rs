//! Binding errors

use crate::EngineId;

/// Binding error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The binding target names no live element
    #[error("could not find element for binding target `{target}`")]
    Resolution { target: String },

    /// A page was asked about an engine it does not own
    #[error("no engine {0} attached to this page")]
    UnknownEngine(EngineId),
}
