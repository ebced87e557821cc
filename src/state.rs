//! Picker state
//!
//! Everything the engine mutates apart from the node store: selection,
//! expansion, query, search results, focus and in-flight action versions.
//! All transitions are synchronous so they can be tested without a runtime.

use crate::generation::{Generations, Ticket};
use crate::search::SearchResults;
use crate::selection::Selection;
use crate::types::NodeId;
use crate::visible::clamp_focus;
use std::collections::HashSet;

/// Generation key of the active search
pub const SEARCH_KEY: &str = "search";

/// Generation key of an expansion of `id`
pub fn expand_key(id: &str) -> String {
    format!("expand:{}", id)
}

/// Generation key of a subtree toggle of `id`
pub fn toggle_key(id: &str) -> String {
    format!("toggle:{}", id)
}

#[derive(Debug, Clone, Default)]
pub struct PickerState {
    pub selection: Selection,
    pub expanded: HashSet<NodeId>,
    pub query: String,
    /// Results of the latest completed search for the current query
    pub search: Option<SearchResults>,
    pub focus: usize,
    pub generations: Generations,
}

impl PickerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Mark `id` expanded and supersede any pending collapse or expand of it
    pub fn begin_expand(&mut self, id: &str) -> Ticket {
        self.expanded.insert(id.to_string());
        self.generations.begin(&expand_key(id))
    }

    /// Undo an expansion whose load failed, unless a newer action took over
    pub fn abort_expand(&mut self, ticket: &Ticket, id: &str) -> bool {
        if self.generations.is_current(ticket) {
            self.expanded.remove(id);
            true
        } else {
            false
        }
    }

    pub fn collapse(&mut self, id: &str) -> bool {
        self.generations.invalidate(&expand_key(id));
        self.expanded.remove(id)
    }

    /// Record a new query; focus returns to the top
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.focus = 0;
    }

    /// Start a search for the current query
    pub fn begin_search(&mut self) -> Ticket {
        self.generations.begin(SEARCH_KEY)
    }

    /// Store search results if `ticket` is still current
    pub fn apply_search(&mut self, ticket: &Ticket, results: Option<SearchResults>) -> bool {
        if !self.generations.is_current(ticket) {
            return false;
        }
        self.search = results;
        true
    }

    /// Leave search mode, dropping results and any in-flight search
    pub fn clear_query(&mut self) {
        self.query.clear();
        self.search = None;
        self.focus = 0;
        self.generations.invalidate(SEARCH_KEY);
    }

    pub fn begin_toggle(&mut self, id: &str) -> Ticket {
        self.generations.begin(&toggle_key(id))
    }

    /// Apply a subtree toggle if `ticket` is still current
    pub fn apply_toggle(&mut self, ticket: &Ticket, leaves: Vec<NodeId>, checked: bool) -> bool {
        if !self.generations.is_current(ticket) {
            return false;
        }
        self.selection.set_many(leaves, checked);
        true
    }

    /// Check or uncheck a single leaf right away
    pub fn set_leaf(&mut self, id: &str, checked: bool) {
        self.generations.invalidate(&toggle_key(id));
        self.selection.set(id, checked);
    }

    /// Re-clamp focus to a visible set of `len` nodes
    pub fn clamp_focus(&mut self, len: usize) -> usize {
        self.focus = clamp_focus(self.focus, len);
        self.focus
    }
}
