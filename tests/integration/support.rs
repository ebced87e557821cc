//! Shared fixtures: a catalog dataset and a source wrapper that counts calls
//! and fails on demand.

use async_trait::async_trait;
use parking_lot::Mutex;
use picktree::{InMemorySource, Node, NodeSource, Picker, PickerError, DEFAULT_ROOT_ID};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

pub fn catalog() -> Vec<Node> {
    vec![
        Node::branch("electronics", "Electronics", None),
        Node::branch("audio", "Audio", Some("electronics")),
        Node::leaf("headphones", "Headphones", Some("audio")),
        Node::leaf("speakers", "Speakers", Some("audio")),
        Node::leaf("phones", "Phones", Some("electronics")),
        Node::leaf("photo", "Photo Cameras", Some("electronics")),
        Node::branch("books", "Books", None),
        Node::leaf("phonics", "Phonics Workbooks", Some("books")),
        Node::leaf("novels", "Novels", Some("books")),
        Node::leaf("garden", "Garden", None),
    ]
}

/// The two-level dataset: Electronics with a single leaf, Phones
pub fn minimal() -> Vec<Node> {
    vec![
        Node::branch("electronics", "Electronics", None),
        Node::leaf("phones", "Phones", Some("electronics")),
    ]
}

pub struct TrackingSource {
    inner: InMemorySource,
    children_calls: Mutex<HashMap<String, usize>>,
    path_calls: Mutex<usize>,
    failing: Mutex<HashSet<String>>,
}

impl TrackingSource {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self::with_latency(nodes, Duration::ZERO)
    }

    pub fn with_latency(nodes: Vec<Node>, latency: Duration) -> Self {
        let mut inner = InMemorySource::from_nodes(DEFAULT_ROOT_ID, nodes).unwrap();
        if !latency.is_zero() {
            inner = inner.with_latency(latency);
        }
        Self {
            inner,
            children_calls: Mutex::new(HashMap::new()),
            path_calls: Mutex::new(0),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Make every later fetch of `id`'s children fail
    pub fn fail_on(&self, id: &str) {
        self.failing.lock().insert(id.to_string());
    }

    pub fn heal(&self, id: &str) {
        self.failing.lock().remove(id);
    }

    pub fn children_calls(&self, id: &str) -> usize {
        self.children_calls.lock().get(id).copied().unwrap_or(0)
    }

    pub fn total_children_calls(&self) -> usize {
        self.children_calls.lock().values().sum()
    }

    pub fn path_calls(&self) -> usize {
        *self.path_calls.lock()
    }
}

#[async_trait]
impl NodeSource for TrackingSource {
    async fn fetch_children(&self, parent_id: &str) -> Result<Vec<Node>, PickerError> {
        *self
            .children_calls
            .lock()
            .entry(parent_id.to_string())
            .or_insert(0) += 1;
        let fail = self.failing.lock().contains(parent_id);
        if fail {
            return Err(PickerError::fetch(parent_id, "backend unavailable"));
        }
        self.inner.fetch_children(parent_id).await
    }

    async fn fetch_path_to_node(&self, node_id: &str) -> Result<Vec<Node>, PickerError> {
        *self.path_calls.lock() += 1;
        self.inner.fetch_path_to_node(node_id).await
    }
}

pub fn picker_over(source: &Arc<TrackingSource>) -> Picker {
    Picker::new(source.clone())
}

pub fn ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}
