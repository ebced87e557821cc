//! Selection Engine
//!
//! Holds the set of explicitly checked leaves and derives the tri-state
//! display of any node from its loaded descendants. Non-leaf state is never
//! stored.

use crate::tree::Node;
use crate::types::{Children, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Display state of a checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Checked,
    Indeterminate,
    Unchecked,
}

impl CheckState {
    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }

    /// Glyph used by the text renderer
    pub fn glyph(self) -> &'static str {
        match self {
            CheckState::Checked => "[x]",
            CheckState::Indeterminate => "[-]",
            CheckState::Unchecked => "[ ]",
        }
    }
}

/// Checked leaves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    checked: HashSet<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` was explicitly checked. Only leaves are ever stored.
    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.contains(id)
    }

    /// Check or uncheck a single leaf
    pub fn set(&mut self, id: impl Into<NodeId>, checked: bool) {
        let id = id.into();
        if checked {
            self.checked.insert(id);
        } else {
            self.checked.remove(&id);
        }
    }

    /// Check or uncheck a batch of leaves in one update
    pub fn set_many<I>(&mut self, ids: I, checked: bool)
    where
        I: IntoIterator<Item = NodeId>,
    {
        if checked {
            self.checked.extend(ids);
        } else {
            for id in ids {
                self.checked.remove(&id);
            }
        }
    }

    /// Checked ids, sorted
    pub fn checked_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.checked.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }

    /// Derive the display state of `node`.
    ///
    /// Leaves report membership. A non-leaf is `Checked` when every loaded
    /// child is checked, `Unchecked` when none is checked or indeterminate,
    /// `Indeterminate` otherwise. A non-leaf whose children are not loaded
    /// (or are loaded and empty) is `Unchecked`.
    pub fn derived_state<F>(&self, node: &Node, children_of: &F) -> CheckState
    where
        F: Fn(&str) -> Option<Children>,
    {
        let mut visiting = HashSet::new();
        self.derive(node, children_of, &mut visiting)
    }

    /// Whether a non-leaf derives to fully checked
    pub fn are_all_children_checked<F>(&self, node: &Node, children_of: &F) -> bool
    where
        F: Fn(&str) -> Option<Children>,
    {
        !node.is_leaf() && self.derived_state(node, children_of).is_checked()
    }

    fn derive<F>(&self, node: &Node, children_of: &F, visiting: &mut HashSet<NodeId>) -> CheckState
    where
        F: Fn(&str) -> Option<Children>,
    {
        if node.is_leaf() {
            return if self.is_checked(&node.id) {
                CheckState::Checked
            } else {
                CheckState::Unchecked
            };
        }

        let children = match children_of(&node.id) {
            Some(children) if !children.is_empty() => children,
            _ => return CheckState::Unchecked,
        };

        // Malformed data could loop back to an ancestor
        if !visiting.insert(node.id.clone()) {
            return CheckState::Unchecked;
        }

        let mut checked = 0;
        let mut unchecked = 0;
        for child in children.iter() {
            match self.derive(child, children_of, visiting) {
                CheckState::Checked => checked += 1,
                CheckState::Unchecked => unchecked += 1,
                CheckState::Indeterminate => {}
            }
        }
        visiting.remove(&node.id);

        if checked == children.len() {
            CheckState::Checked
        } else if unchecked == children.len() {
            CheckState::Unchecked
        } else {
            CheckState::Indeterminate
        }
    }
}
