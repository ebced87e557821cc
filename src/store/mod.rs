//! Node Store
//!
//! Lazily populated mapping from a parent id to its ordered direct children.
//! An entry's presence means "already fetched"; a parent that was fetched and
//! has no children holds an empty list. Entries are never evicted.

use crate::concurrency::FetchLockManager;
use crate::error::PickerError;
use crate::source::NodeSource;
use crate::tree::Node;
use crate::types::{Children, ChildrenMap, NodeId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache of fetched children, shared by the loader, search and projector.
pub struct NodeStore {
    source: Arc<dyn NodeSource>,
    root_id: NodeId,
    /// parent id -> children
    entries: RwLock<ChildrenMap>,
    /// Fetched by a staged traversal, not yet committed
    pending: RwLock<ChildrenMap>,
    /// Every node seen in a committed entry, by id
    nodes: RwLock<HashMap<NodeId, Node>>,
    fetch_locks: FetchLockManager,
}

fn empty_children() -> Children {
    Arc::from(Vec::new())
}

impl NodeStore {
    pub fn new(source: Arc<dyn NodeSource>, root_id: impl Into<NodeId>) -> Self {
        Self {
            source,
            root_id: root_id.into(),
            entries: RwLock::new(HashMap::new()),
            pending: RwLock::new(HashMap::new()),
            nodes: RwLock::new(HashMap::new()),
            fetch_locks: FetchLockManager::new(),
        }
    }

    /// Id of the synthetic root whose children are the top-level nodes
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn source(&self) -> &Arc<dyn NodeSource> {
        &self.source
    }

    /// Cached children of `parent_id`, without touching the source
    pub fn get(&self, parent_id: &str) -> Option<Children> {
        self.entries.read().get(parent_id).cloned()
    }

    /// Cached children, or an empty list when not loaded
    pub fn children_or_empty(&self, parent_id: &str) -> Children {
        self.get(parent_id).unwrap_or_else(empty_children)
    }

    pub fn is_loaded(&self, parent_id: &str) -> bool {
        self.entries.read().contains_key(parent_id)
    }

    /// A node seen in any committed entry
    pub fn node(&self, id: &str) -> Option<Node> {
        self.nodes.read().get(id).cloned()
    }

    /// Number of loaded parents
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of the whole mapping; children lists are shared, not cloned
    pub fn snapshot(&self) -> ChildrenMap {
        self.entries.read().clone()
    }

    /// Return the children of `parent_id`, fetching and caching them on a miss.
    ///
    /// Concurrent misses for the same id are coalesced into one source call,
    /// including misses queued behind a staged fetch that has not committed.
    /// A known leaf yields an empty list and never becomes a key.
    pub async fn get_or_fetch(&self, parent_id: &str) -> Result<Children, PickerError> {
        if let Some(children) = self.get(parent_id) {
            return Ok(children);
        }
        if self.is_known_leaf(parent_id) {
            return Ok(empty_children());
        }

        let lock = self.fetch_locks.get_lock(parent_id);
        let result = {
            let _guard = lock.lock().await;
            match self.get(parent_id) {
                Some(children) => Ok(children),
                None => {
                    let fetched = match self.take_pending(parent_id) {
                        Some(children) => Ok(children),
                        None => self.fetch_from_source(parent_id).await,
                    };
                    fetched.and_then(|children| {
                        let mut batch = HashMap::new();
                        batch.insert(parent_id.to_string(), children.clone());
                        self.commit(batch).map(|_| children)
                    })
                }
            }
        };
        drop(lock);
        self.fetch_locks.release(parent_id);
        result
    }

    /// Fetch children under the per-id lock without committing them.
    ///
    /// Used by staged traversals that commit a whole batch only on success.
    /// The result is held as pending until committed or discarded, so callers
    /// queued on the same id reuse it. A cached entry is returned as-is; a
    /// known leaf yields an empty list.
    pub async fn fetch_detached(&self, parent_id: &str) -> Result<Children, PickerError> {
        if let Some(children) = self.get(parent_id) {
            return Ok(children);
        }
        if self.is_known_leaf(parent_id) {
            return Ok(empty_children());
        }

        let lock = self.fetch_locks.get_lock(parent_id);
        let result = {
            let _guard = lock.lock().await;
            let pending = self.pending.read().get(parent_id).cloned();
            match (self.get(parent_id), pending) {
                (Some(children), _) => Ok(children),
                (None, Some(children)) => {
                    debug!(parent_id, "Reusing pending children");
                    Ok(children)
                }
                (None, None) => self.fetch_from_source(parent_id).await.map(|children| {
                    self.pending
                        .write()
                        .insert(parent_id.to_string(), children.clone());
                    children
                }),
            }
        };
        drop(lock);
        self.fetch_locks.release(parent_id);
        result
    }

    /// Drop pending children of abandoned staged traversals
    pub fn discard_pending<'a>(&self, parent_ids: impl IntoIterator<Item = &'a str>) {
        let mut pending = self.pending.write();
        for id in parent_ids {
            pending.remove(id);
        }
    }

    /// Number of fetched levels waiting for a commit
    pub fn pending_len(&self) -> usize {
        self.pending.read().len()
    }

    /// Insert a batch of entries in one update.
    ///
    /// Rejects the whole batch if any entry, empty or not, is keyed by a known
    /// leaf. Existing entries are overwritten (last writer wins). Committed ids
    /// stop being pending.
    pub fn commit(&self, batch: ChildrenMap) -> Result<usize, PickerError> {
        if batch.is_empty() {
            return Ok(0);
        }
        {
            let nodes = self.nodes.read();
            let batch_leaf = |id: &str| {
                batch
                    .values()
                    .flat_map(|children| children.iter())
                    .any(|n| n.id == id && n.is_leaf())
            };
            for parent_id in batch.keys() {
                let known_leaf = nodes.get(parent_id).map(Node::is_leaf).unwrap_or(false);
                if known_leaf || batch_leaf(parent_id) {
                    return Err(PickerError::StateInconsistency(format!(
                        "Leaf node {} cannot be a store key",
                        parent_id
                    )));
                }
            }
        }
        {
            let mut nodes = self.nodes.write();
            for child in batch.values().flat_map(|children| children.iter()) {
                nodes.insert(child.id.clone(), child.clone());
            }
        }
        self.discard_pending(batch.keys().map(String::as_str));
        let count = batch.len();
        self.entries.write().extend(batch);
        debug!(entries = count, "Committed children to node store");
        Ok(count)
    }

    fn is_known_leaf(&self, id: &str) -> bool {
        self.nodes.read().get(id).map(Node::is_leaf).unwrap_or(false)
    }

    fn take_pending(&self, parent_id: &str) -> Option<Children> {
        self.pending.write().remove(parent_id)
    }

    async fn fetch_from_source(&self, parent_id: &str) -> Result<Children, PickerError> {
        debug!(parent_id, "Fetching children from source");
        match self.source.fetch_children(parent_id).await {
            Ok(children) => {
                debug!(parent_id, count = children.len(), "Fetched children");
                Ok(Arc::from(children))
            }
            Err(e) => {
                warn!(parent_id, error = %e, "Child fetch failed");
                Err(match e {
                    PickerError::FetchFailure { .. } => e,
                    other => PickerError::fetch(parent_id, other.to_string()),
                })
            }
        }
    }
}
