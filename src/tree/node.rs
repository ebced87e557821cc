//! Picker node representation

use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// One selectable item in the hierarchy
///
/// `has_children` is known up front so the engine can decide whether a node
/// is a leaf without fetching anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

impl Node {
    /// Create a node that may have children
    pub fn branch(id: impl Into<NodeId>, label: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            has_children: true,
            parent_id: parent_id.map(str::to_string),
        }
    }

    /// Create a leaf node
    pub fn leaf(id: impl Into<NodeId>, label: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            has_children: false,
            parent_id: parent_id.map(str::to_string),
        }
    }

    pub fn is_leaf(&self) -> bool {
        !self.has_children
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}
