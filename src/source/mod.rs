//! Node sources
//!
//! The engine never talks to a backend directly. Everything it knows about the
//! hierarchy comes through a [`NodeSource`]: direct children of a parent, and
//! the top-down path to a node.

pub mod memory;

pub use memory::InMemorySource;

use crate::error::PickerError;
use crate::tree::Node;
use async_trait::async_trait;

/// Collaborator that supplies the hierarchy to the engine.
///
/// Both calls must be idempotent and free of side effects; the engine may
/// repeat them for the same id.
#[async_trait]
pub trait NodeSource: Send + Sync {
    /// Fetch the ordered direct children of `parent_id`.
    ///
    /// Unknown parents yield an empty list.
    async fn fetch_children(&self, parent_id: &str) -> Result<Vec<Node>, PickerError>;

    /// Fetch the path from the top-level ancestor down to `node_id`, inclusive.
    ///
    /// Returns an empty list when `node_id` does not exist.
    async fn fetch_path_to_node(&self, node_id: &str) -> Result<Vec<Node>, PickerError>;
}
