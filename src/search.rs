//! Search Engine
//!
//! Full recursive prefix search over the hierarchy. Unloaded levels are
//! fetched on the way down and committed only if the whole traversal succeeds.
//! Each match gets its top-down path from the source.

use crate::error::PickerError;
use crate::loader::StagedFetch;
use crate::store::NodeStore;
use crate::tree::Node;
use crate::types::NodeId;
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Outcome of one query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub query: String,
    /// Matches in pre-order discovery order
    pub matches: Vec<Node>,
    /// match id -> path from the top-level ancestor to the match, inclusive
    pub paths: HashMap<NodeId, Vec<Node>>,
}

impl SearchResults {
    /// Path to a match, empty for ids that did not match
    pub fn path(&self, id: &str) -> &[Node] {
        self.paths.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_match(&self, id: &str) -> bool {
        self.paths.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Whether `query` should put the picker into search mode
pub fn is_active_query(query: &str, min_query_len: usize) -> bool {
    let trimmed = query.trim();
    !trimmed.is_empty() && trimmed.chars().count() >= min_query_len
}

/// Case-insensitive prefix match. `query_lower` must already be lowercase.
pub fn matches_query(label: &str, query_lower: &str) -> bool {
    label.to_lowercase().starts_with(query_lower)
}

pub struct SearchEngine<'a> {
    store: &'a NodeStore,
    min_query_len: usize,
}

impl<'a> SearchEngine<'a> {
    pub fn new(store: &'a NodeStore) -> Self {
        Self {
            store,
            min_query_len: 1,
        }
    }

    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len.max(1);
        self
    }

    /// Run `query` against the whole hierarchy.
    ///
    /// Returns `None` for an inactive (empty or blank) query. The query itself
    /// is matched untrimmed.
    pub async fn search(&self, query: &str) -> Result<Option<SearchResults>, PickerError> {
        if !is_active_query(query, self.min_query_len) {
            return Ok(None);
        }

        let query_lower = query.to_lowercase();
        let matches = self.collect_matches(&query_lower).await?;
        let paths = try_join_all(matches.iter().map(|node| self.resolve_path(node))).await?;

        let paths: HashMap<NodeId, Vec<Node>> = matches
            .iter()
            .map(|node| node.id.clone())
            .zip(paths)
            .collect();

        debug!(query, matches = matches.len(), "Search completed");
        Ok(Some(SearchResults {
            query: query.to_string(),
            matches,
            paths,
        }))
    }

    /// Pre-order traversal from the root collecting every matching node
    async fn collect_matches(&self, query_lower: &str) -> Result<Vec<Node>, PickerError> {
        let root_id = self.store.root_id();
        let mut staging = StagedFetch::new(self.store);
        let mut matches = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        visited.insert(root_id.to_string());

        let top = staging.children(root_id).await?;
        let mut stack: Vec<Node> = top.iter().rev().cloned().collect();

        while let Some(node) = stack.pop() {
            if !visited.insert(node.id.clone()) {
                warn!(node_id = %node.id, "Node reached twice during search, skipping");
                continue;
            }
            if matches_query(&node.label, query_lower) {
                matches.push(node.clone());
            }
            if node.has_children {
                let children = staging.children(&node.id).await?;
                stack.extend(children.iter().rev().cloned());
            }
        }

        staging.commit()?;
        Ok(matches)
    }

    /// Path to a match via the source.
    ///
    /// A missing or malformed chain degrades to the match alone so the path
    /// always ends with the match. Fetch failures abort the search.
    async fn resolve_path(&self, node: &Node) -> Result<Vec<Node>, PickerError> {
        match self.store.source().fetch_path_to_node(&node.id).await {
            Ok(path) if path.last().map(|last| last.id == node.id).unwrap_or(false) => Ok(path),
            Ok(path) => {
                warn!(
                    node_id = %node.id,
                    path_len = path.len(),
                    "Incomplete path from source, using match alone"
                );
                Ok(vec![node.clone()])
            }
            Err(e @ (PickerError::NotFound(_) | PickerError::CycleDetected(_))) => {
                warn!(node_id = %node.id, error = %e, "Unresolvable path, using match alone");
                Ok(vec![node.clone()])
            }
            Err(e @ PickerError::FetchFailure { .. }) => Err(e),
            Err(e) => Err(PickerError::fetch(node.id.clone(), e.to_string())),
        }
    }
}
