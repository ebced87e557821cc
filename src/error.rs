//! Error types for the picker engine.

use crate::types::NodeId;
use thiserror::Error;

/// Errors surfaced by the engine and its collaborators
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PickerError {
    /// A children or path collaborator rejected the request
    #[error("Failed to fetch {id}: {message}")]
    FetchFailure { id: NodeId, message: String },

    /// A referenced node is absent from the dataset
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    /// A parent chain revisits a node or exceeds the depth bound
    #[error("Parent chain cycle or depth overflow at node: {0}")]
    CycleDetected(NodeId),

    /// An internal invariant would be violated by the requested update
    #[error("State inconsistency: {0}")]
    StateInconsistency(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),
}

impl PickerError {
    /// Build a fetch failure for the given node id
    pub fn fetch(id: impl Into<NodeId>, message: impl Into<String>) -> Self {
        PickerError::FetchFailure {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Whether the error originated in a collaborator call
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, PickerError::FetchFailure { .. })
    }
}

impl From<config::ConfigError> for PickerError {
    fn from(err: config::ConfigError) -> Self {
        PickerError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PickerError {
    fn from(err: serde_json::Error) -> Self {
        PickerError::Dataset(err.to_string())
    }
}
