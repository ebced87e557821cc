//! Visible-Set Projector
//!
//! Flattens the current view into the ordered node list that keyboard focus
//! indexes into. Recomputed from scratch on every call.

use crate::search::SearchResults;
use crate::selection::CheckState;
use crate::tree::Node;
use crate::types::{Children, NodeId};
use serde::Serialize;
use std::collections::HashSet;

/// A visible node with its indentation level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleEntry {
    pub node: Node,
    pub depth: usize,
}

/// A visible node annotated for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleRow {
    pub node: Node,
    pub depth: usize,
    pub state: CheckState,
    pub expanded: bool,
    pub focused: bool,
    /// False for path ancestors in search view; only matches are toggleable there
    pub enabled: bool,
}

/// Search view: every match path in match order, top-down, first occurrence wins.
///
/// Depth is the node's position within the path where it first appears.
pub fn search_entries(results: &SearchResults) -> Vec<VisibleEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for matched in &results.matches {
        for (depth, node) in results.path(&matched.id).iter().enumerate() {
            if seen.insert(node.id.as_str()) {
                out.push(VisibleEntry {
                    node: node.clone(),
                    depth,
                });
            }
        }
    }
    out
}

/// Tree view: pre-order over loaded nodes, descending only into expanded ones.
pub fn tree_entries<F>(root_id: &str, children_of: F, expanded: &HashSet<NodeId>) -> Vec<VisibleEntry>
where
    F: Fn(&str) -> Option<Children>,
{
    let mut out = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(root_id.to_string());

    let mut stack: Vec<(Node, usize)> = match children_of(root_id) {
        Some(top) => top.iter().rev().map(|n| (n.clone(), 0)).collect(),
        None => return out,
    };

    while let Some((node, depth)) = stack.pop() {
        if !visited.insert(node.id.clone()) {
            continue;
        }
        if node.has_children && expanded.contains(&node.id) {
            if let Some(children) = children_of(&node.id) {
                stack.extend(children.iter().rev().map(|n| (n.clone(), depth + 1)));
            }
        }
        out.push(VisibleEntry { node, depth });
    }
    out
}

/// Keep a focus index inside `[0, max(0, len - 1)]`
pub fn clamp_focus(focus: usize, len: usize) -> usize {
    focus.min(len.saturating_sub(1))
}
