//! Picker engine
//!
//! Owns the node store and the picker state and exposes every user-facing
//! operation: expansion, checkbox toggles, search, keyboard input and the
//! visible projection. Operations take `&self`; state locks are never held
//! across an await, so independent actions may interleave freely. Results of
//! superseded actions are dropped through generation tickets.

use crate::config::PickerConfig;
use crate::error::PickerError;
use crate::loader::{leaf_descendant_ids, DescendantLoader};
use crate::navigator::{self, Key, KeyOutcome, NavCommand};
use crate::search::{is_active_query, SearchEngine, SearchResults};
use crate::selection::CheckState;
use crate::source::{InMemorySource, NodeSource};
use crate::state::PickerState;
use crate::store::NodeStore;
use crate::tree::Node;
use crate::types::{Children, NodeId, DEFAULT_ROOT_ID};
use crate::visible::{search_entries, tree_entries, VisibleEntry, VisibleRow};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Hierarchical multi-select picker engine
pub struct Picker {
    store: NodeStore,
    state: RwLock<PickerState>,
    min_query_len: usize,
}

impl Picker {
    /// Create a picker over `source` with the default root id
    pub fn new(source: Arc<dyn NodeSource>) -> Self {
        Self::with_root(source, DEFAULT_ROOT_ID)
    }

    pub fn with_root(source: Arc<dyn NodeSource>, root_id: impl Into<NodeId>) -> Self {
        Self {
            store: NodeStore::new(source, root_id),
            state: RwLock::new(PickerState::new()),
            min_query_len: 1,
        }
    }

    /// Create a picker over `source` using the root id and search settings of `config`
    pub fn with_config(source: Arc<dyn NodeSource>, config: &PickerConfig) -> Self {
        let mut picker = Self::with_root(source, config.root_id.clone());
        picker.min_query_len = config.search.min_query_len.max(1);
        picker
    }

    /// Create a picker over the JSON dataset named in `config`
    pub fn from_config(config: &PickerConfig) -> Result<Self, PickerError> {
        let dataset = config.source.dataset.as_ref().ok_or_else(|| {
            PickerError::Config("source.dataset is required to build a picker".to_string())
        })?;
        let source = InMemorySource::from_path(config.root_id.clone(), dataset)?
            .with_latency(Duration::from_millis(config.source.latency_ms))
            .with_max_path_depth(config.source.max_path_depth);
        info!(
            dataset = %dataset.display(),
            nodes = source.len(),
            "Loaded picker dataset"
        );
        Ok(Self::with_config(Arc::new(source), config))
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Load the top-level nodes
    pub async fn load_roots(&self) -> Result<Children, PickerError> {
        let top = self.store.get_or_fetch(self.store.root_id()).await?;
        self.refresh_focus();
        Ok(top)
    }

    /// Top-level nodes loaded so far
    pub fn top_level(&self) -> Children {
        self.store.children_or_empty(self.store.root_id())
    }

    /// Look up a node the picker has seen
    pub fn node(&self, id: &str) -> Option<Node> {
        if let Some(node) = self.store.node(id) {
            return Some(node);
        }
        let state = self.state.read();
        state
            .search
            .as_ref()
            .and_then(|results| results.paths.values().flatten().find(|n| n.id == id).cloned())
    }

    fn require_node(&self, id: &str) -> Result<Node, PickerError> {
        self.node(id)
            .ok_or_else(|| PickerError::NotFound(id.to_string()))
    }

    // Expansion

    pub fn is_expanded(&self, id: &str) -> bool {
        self.state.read().is_expanded(id)
    }

    /// Expand `id`, loading its children if needed.
    ///
    /// The node counts as expanded while its children load. If the load fails
    /// the expansion is rolled back and the error returned.
    pub async fn expand(&self, id: &str) -> Result<(), PickerError> {
        let node = self.require_node(id)?;
        if node.is_leaf() {
            return Ok(());
        }

        let ticket = self.state.write().begin_expand(id);
        if let Err(e) = self.store.get_or_fetch(id).await {
            warn!(node_id = id, error = %e, "Expand failed");
            self.state.write().abort_expand(&ticket, id);
            self.refresh_focus();
            return Err(e);
        }
        debug!(node_id = id, "Expanded");
        self.refresh_focus();
        Ok(())
    }

    pub fn collapse(&self, id: &str) -> bool {
        let collapsed = self.state.write().collapse(id);
        self.refresh_focus();
        collapsed
    }

    /// Expand a collapsed node or collapse an expanded one
    pub async fn toggle_expanded(&self, id: &str) -> Result<(), PickerError> {
        if self.is_expanded(id) {
            self.collapse(id);
            Ok(())
        } else {
            self.expand(id).await
        }
    }

    /// Load the whole hierarchy and expand every non-leaf node
    pub async fn expand_all(&self) -> Result<(), PickerError> {
        let covered = DescendantLoader::new(&self.store)
            .load_subtree(self.store.root_id())
            .await?;
        {
            let mut state = self.state.write();
            for id in covered.keys().filter(|id| id.as_str() != self.store.root_id()) {
                state.begin_expand(id);
            }
        }
        self.refresh_focus();
        Ok(())
    }

    /// Expand every ancestor of `id` so it shows in tree view, then focus it
    /// if the tree view is active.
    pub async fn reveal(&self, id: &str) -> Result<(), PickerError> {
        let path = self.store.source().fetch_path_to_node(id).await?;
        if path.last().map(|n| n.id.as_str()) != Some(id) {
            return Err(PickerError::NotFound(id.to_string()));
        }

        self.store.get_or_fetch(self.store.root_id()).await?;
        for ancestor in &path[..path.len() - 1] {
            self.expand(&ancestor.id).await?;
        }

        let mut state = self.state.write();
        if state.search.is_none() {
            let entries = self.entries(&state);
            if let Some(index) = entries.iter().position(|e| e.node.id == id) {
                state.focus = index;
            }
        }
        Ok(())
    }

    // Selection

    /// Whether `id` is a leaf the user checked
    pub fn is_checked(&self, id: &str) -> bool {
        let leaf = self.node(id).map(|n| n.is_leaf()).unwrap_or(false);
        leaf && self.state.read().selection.is_checked(id)
    }

    /// Display state of `id`; unknown ids are unchecked
    pub fn derived_state(&self, id: &str) -> CheckState {
        match self.node(id) {
            Some(node) => self.derived_state_of(&self.state.read(), &node),
            None => CheckState::Unchecked,
        }
    }

    pub fn are_all_children_checked(&self, id: &str) -> bool {
        match self.node(id) {
            Some(node) => {
                let state = self.state.read();
                state
                    .selection
                    .are_all_children_checked(&node, &|id: &str| self.store.get(id))
            }
            None => false,
        }
    }

    fn derived_state_of(&self, state: &PickerState, node: &Node) -> CheckState {
        state
            .selection
            .derived_state(node, &|id: &str| self.store.get(id))
    }

    /// Checked leaves, sorted
    pub fn checked_ids(&self) -> Vec<NodeId> {
        self.state.read().selection.checked_ids()
    }

    /// Set the checkbox of `id` to `checked`
    pub async fn toggle(&self, id: &str, checked: bool) -> Result<(), PickerError> {
        let node = self.require_node(id)?;
        self.toggle_node(&node, checked).await
    }

    /// Set the checkbox of `node` to `checked`.
    ///
    /// A non-leaf first materializes its whole subtree, then every leaf below
    /// it changes in a single update. A failed load changes nothing.
    pub async fn toggle_node(&self, node: &Node, checked: bool) -> Result<(), PickerError> {
        if node.is_leaf() {
            self.state.write().set_leaf(&node.id, checked);
            debug!(node_id = %node.id, checked, "Toggled leaf");
            return Ok(());
        }

        let ticket = self.state.write().begin_toggle(&node.id);
        let covered = match DescendantLoader::new(&self.store).load_subtree(&node.id).await {
            Ok(covered) => covered,
            Err(e) => {
                warn!(node_id = %node.id, error = %e, "Subtree load failed, toggle aborted");
                return Err(e);
            }
        };

        let leaves = leaf_descendant_ids(&node.id, &covered);
        let count = leaves.len();
        let applied = self.state.write().apply_toggle(&ticket, leaves, checked);
        if applied {
            debug!(node_id = %node.id, checked, leaves = count, "Toggled subtree");
        } else {
            debug!(node_id = %node.id, "Discarded superseded subtree toggle");
        }
        self.refresh_focus();
        Ok(())
    }

    // Search

    pub fn query(&self) -> String {
        self.state.read().query.clone()
    }

    /// Whether the current query puts the picker in search view
    pub fn is_searching(&self) -> bool {
        is_active_query(&self.state.read().query, self.min_query_len)
    }

    pub fn search_results(&self) -> Option<SearchResults> {
        self.state.read().search.clone()
    }

    /// Replace the query and run the search.
    ///
    /// Focus returns to the top. A blank query leaves search view. If a newer
    /// query (or a clear) arrives while this one runs, its results are
    /// dropped. A failed search keeps the previous results.
    pub async fn set_query(&self, query: &str) -> Result<(), PickerError> {
        let ticket = {
            let mut state = self.state.write();
            state.set_query(query);
            if !is_active_query(query, self.min_query_len) {
                state.clear_query();
                drop(state);
                self.refresh_focus();
                return Ok(());
            }
            state.begin_search()
        };

        let results = SearchEngine::new(&self.store)
            .with_min_query_len(self.min_query_len)
            .search(query)
            .await;

        match results {
            Ok(results) => {
                let applied = self.state.write().apply_search(&ticket, results);
                if !applied {
                    debug!(query, "Discarded superseded search results");
                }
                self.refresh_focus();
                Ok(())
            }
            Err(e) => {
                warn!(query, error = %e, "Search failed");
                Err(e)
            }
        }
    }

    /// Leave search view and return focus to the top
    pub fn clear_query(&self) {
        self.state.write().clear_query();
        self.refresh_focus();
    }

    // Projection

    fn entries(&self, state: &PickerState) -> Vec<VisibleEntry> {
        if is_active_query(&state.query, self.min_query_len) {
            return state.search.as_ref().map(search_entries).unwrap_or_default();
        }
        tree_entries(
            self.store.root_id(),
            |id| self.store.get(id),
            &state.expanded,
        )
    }

    /// Nodes currently shown, in display order
    pub fn visible_nodes(&self) -> Vec<Node> {
        let state = self.state.read();
        self.entries(&state).into_iter().map(|e| e.node).collect()
    }

    /// Visible nodes annotated for presentation
    pub fn rows(&self) -> Vec<VisibleRow> {
        let state = self.state.read();
        let searching = is_active_query(&state.query, self.min_query_len);
        self.entries(&state)
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let enabled = !searching
                    || state
                        .search
                        .as_ref()
                        .map(|r| r.is_match(&entry.node.id))
                        .unwrap_or(false);
                VisibleRow {
                    state: self.derived_state_of(&state, &entry.node),
                    expanded: state.is_expanded(&entry.node.id),
                    focused: index == state.focus,
                    enabled,
                    depth: entry.depth,
                    node: entry.node,
                }
            })
            .collect()
    }

    // Keyboard

    pub fn focus(&self) -> usize {
        self.state.read().focus
    }

    pub fn focused_node(&self) -> Option<Node> {
        let state = self.state.read();
        self.entries(&state)
            .into_iter()
            .nth(state.focus)
            .map(|e| e.node)
    }

    /// Re-clamp focus against the current visible set
    fn refresh_focus(&self) {
        let mut state = self.state.write();
        let len = self.entries(&state).len();
        state.clamp_focus(len);
    }

    /// Handle one key press.
    ///
    /// Returns whether the key was consumed. Errors from the lazy loads a key
    /// triggers are returned after focus has moved.
    pub async fn handle_key(&self, key: &Key) -> Result<KeyOutcome, PickerError> {
        let plan = {
            let state = self.state.read();
            let visible: Vec<Node> = self.entries(&state).into_iter().map(|e| e.node).collect();
            let mut plan = navigator::plan(
                key,
                state.focus,
                &visible,
                |id| state.is_expanded(id),
                |node| {
                    if node.is_leaf() {
                        state.selection.is_checked(&node.id)
                    } else {
                        state
                            .selection
                            .are_all_children_checked(node, &|id: &str| self.store.get(id))
                    }
                },
            );

            // Path ancestors in search view are shown but not toggleable
            if let NavCommand::Toggle { node, .. } = &plan.command {
                let disabled = is_active_query(&state.query, self.min_query_len)
                    && !state
                        .search
                        .as_ref()
                        .map(|r| r.is_match(&node.id))
                        .unwrap_or(false);
                if disabled {
                    plan.command = NavCommand::None;
                }
            }
            plan
        };

        debug!(key = %key, focus = plan.focus, command = ?plan.command, "Key planned");
        self.state.write().focus = plan.focus;

        match plan.command {
            NavCommand::None => self.refresh_focus(),
            NavCommand::Expand(node) => self.expand(&node.id).await?,
            NavCommand::Collapse(node) => {
                self.collapse(&node.id);
            }
            NavCommand::Toggle { node, target } => self.toggle_node(&node, target).await?,
            NavCommand::ClearQuery => self.clear_query(),
        }

        Ok(plan.outcome)
    }
}
