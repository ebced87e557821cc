//! In-memory node source backed by a `parent id -> children` dataset.

use super::NodeSource;
use crate::error::PickerError;
use crate::tree::Node;
use crate::types::{NodeId, DEFAULT_ROOT_ID};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default bound on parent-chain length when resolving paths
pub const DEFAULT_MAX_PATH_DEPTH: usize = 256;

/// Dataset held entirely in memory, optionally with simulated latency.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    root_id: NodeId,
    children: HashMap<NodeId, Vec<Node>>,
    index: HashMap<NodeId, Node>,
    latency: Option<Duration>,
    max_path_depth: usize,
}

impl InMemorySource {
    /// Build a source from a `parent id -> children` map.
    ///
    /// Fails if any node id appears more than once.
    pub fn from_map(
        root_id: impl Into<NodeId>,
        children: HashMap<NodeId, Vec<Node>>,
    ) -> Result<Self, PickerError> {
        let mut index = HashMap::new();
        for nodes in children.values() {
            for node in nodes {
                if index.insert(node.id.clone(), node.clone()).is_some() {
                    return Err(PickerError::Dataset(format!(
                        "Duplicate node id in dataset: {}",
                        node.id
                    )));
                }
            }
        }
        Ok(Self {
            root_id: root_id.into(),
            children,
            index,
            latency: None,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
        })
    }

    /// Build a source from a flat node list, grouping by `parent_id`.
    ///
    /// Nodes without a parent become children of `root_id`. Input order is
    /// kept within each parent.
    pub fn from_nodes(
        root_id: impl Into<NodeId>,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<Self, PickerError> {
        let root_id = root_id.into();
        let mut children: HashMap<NodeId, Vec<Node>> = HashMap::new();
        for node in nodes {
            let parent = node.parent_id.clone().unwrap_or_else(|| root_id.clone());
            children.entry(parent).or_default().push(node);
        }
        Self::from_map(root_id, children)
    }

    /// Parse a JSON object of the form `{ "<parent id>": [node, ...], ... }`.
    pub fn from_json_str(root_id: impl Into<NodeId>, json: &str) -> Result<Self, PickerError> {
        let children: HashMap<NodeId, Vec<Node>> = serde_json::from_str(json)?;
        Self::from_map(root_id, children)
    }

    /// Load a JSON dataset file.
    pub fn from_path(root_id: impl Into<NodeId>, path: &Path) -> Result<Self, PickerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PickerError::Dataset(format!("Failed to read dataset {}: {}", path.display(), e))
        })?;
        Self::from_json_str(root_id, &content)
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = if latency.is_zero() { None } else { Some(latency) };
        self
    }

    pub fn with_max_path_depth(mut self, max_path_depth: usize) -> Self {
        self.max_path_depth = max_path_depth.max(1);
        self
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Look up a node anywhere in the dataset.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Walk `parent_id` links upward from `node_id`.
    ///
    /// Bounded by a visited set and `max_path_depth`, so malformed chains
    /// end in an error instead of spinning.
    pub fn resolve_path(&self, node_id: &str) -> Result<Vec<Node>, PickerError> {
        if !self.index.contains_key(node_id) {
            return Ok(Vec::new());
        }

        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(node_id.to_string());

        while let Some(id) = current {
            if id == self.root_id {
                break;
            }
            if !visited.insert(id.clone()) || path.len() >= self.max_path_depth {
                return Err(PickerError::CycleDetected(id));
            }
            let node = self
                .index
                .get(&id)
                .ok_or_else(|| PickerError::NotFound(id.clone()))?;
            path.push(node.clone());
            current = node.parent_id.clone();
        }

        path.reverse();
        Ok(path)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_string(),
            children: HashMap::new(),
            index: HashMap::new(),
            latency: None,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
        }
    }
}

#[async_trait]
impl NodeSource for InMemorySource {
    async fn fetch_children(&self, parent_id: &str) -> Result<Vec<Node>, PickerError> {
        self.simulate_latency().await;
        let children = self.children.get(parent_id).cloned().unwrap_or_default();
        debug!(parent_id, count = children.len(), "Served children");
        Ok(children)
    }

    async fn fetch_path_to_node(&self, node_id: &str) -> Result<Vec<Node>, PickerError> {
        self.simulate_latency().await;
        self.resolve_path(node_id)
    }
}
