//! Descendant Loader
//!
//! Materializes whole subtrees in the node store. Traversal uses an explicit
//! work stack with a visited guard. Levels fetched during one load are staged
//! and committed together, so a failed branch leaves the store untouched.

use crate::error::PickerError;
use crate::store::NodeStore;
use crate::tree::Node;
use crate::types::{Children, ChildrenMap, NodeId};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Fetch-or-cache view over the store that holds new levels back until commit.
pub(crate) struct StagedFetch<'a> {
    store: &'a NodeStore,
    staged: ChildrenMap,
}

impl<'a> StagedFetch<'a> {
    pub(crate) fn new(store: &'a NodeStore) -> Self {
        Self {
            store,
            staged: ChildrenMap::new(),
        }
    }

    /// Children of `parent_id` from the store, the staging area, or the source
    pub(crate) async fn children(&mut self, parent_id: &str) -> Result<Children, PickerError> {
        if let Some(children) = self.store.get(parent_id) {
            return Ok(children);
        }
        if let Some(children) = self.staged.get(parent_id) {
            return Ok(children.clone());
        }
        let children = self.store.fetch_detached(parent_id).await?;
        self.staged.insert(parent_id.to_string(), children.clone());
        Ok(children)
    }

    /// Number of levels fetched but not yet committed
    pub(crate) fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Write every staged level to the store in one update
    pub(crate) fn commit(mut self) -> Result<usize, PickerError> {
        let staged = std::mem::take(&mut self.staged);
        self.store.commit(staged)
    }
}

impl Drop for StagedFetch<'_> {
    /// An abandoned traversal releases whatever it left pending in the store
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            self.store.discard_pending(self.staged.keys().map(String::as_str));
        }
    }
}

/// Loads complete subtrees through the node store
pub struct DescendantLoader<'a> {
    store: &'a NodeStore,
}

impl<'a> DescendantLoader<'a> {
    pub fn new(store: &'a NodeStore) -> Self {
        Self { store }
    }

    /// Ensure every level below `node_id` is loaded.
    ///
    /// Returns the children of `node_id` and of every non-leaf descendant.
    /// Only levels missing from the store reach the source. On any fetch
    /// failure nothing is committed and the error is returned.
    pub async fn load_subtree(&self, node_id: &str) -> Result<ChildrenMap, PickerError> {
        let mut covered = ChildrenMap::new();
        if self.store.node(node_id).map(|n| n.is_leaf()).unwrap_or(false) {
            return Ok(covered);
        }

        let mut staging = StagedFetch::new(self.store);
        let mut stack: Vec<NodeId> = vec![node_id.to_string()];
        let mut visited: HashSet<NodeId> = HashSet::new();

        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                warn!(node_id = %id, "Node reached twice while loading subtree, skipping");
                continue;
            }
            let children = staging.children(&id).await?;
            for child in children.iter().rev() {
                if child.has_children {
                    stack.push(child.id.clone());
                }
            }
            covered.insert(id, children);
        }

        let fetched = staging.staged_len();
        staging.commit()?;
        debug!(
            node_id,
            levels = covered.len(),
            fetched,
            "Subtree loaded"
        );
        Ok(covered)
    }
}

/// Every descendant of `node_id` present in `map`, in pre-order.
pub fn descendants(node_id: &str, map: &ChildrenMap) -> Vec<Node> {
    let mut out = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(node_id);

    let mut stack: Vec<&Node> = match map.get(node_id) {
        Some(children) => children.iter().rev().collect(),
        None => return out,
    };

    while let Some(node) = stack.pop() {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        out.push(node.clone());
        if node.has_children {
            if let Some(children) = map.get(&node.id) {
                stack.extend(children.iter().rev());
            }
        }
    }
    out
}

/// Ids of the leaf descendants of `node_id` present in `map`.
pub fn leaf_descendant_ids(node_id: &str, map: &ChildrenMap) -> Vec<NodeId> {
    descendants(node_id, map)
        .into_iter()
        .filter(Node::is_leaf)
        .map(|n| n.id)
        .collect()
}
