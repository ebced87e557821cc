//! Core types for the picker engine.

use std::collections::HashMap;
use std::sync::Arc;

use crate::tree::node::Node;

/// NodeId: Stable identifier of a picker node, unique across the whole tree
pub type NodeId = String;

/// Ordered, immutable list of a parent's direct children
pub type Children = Arc<[Node]>;

/// ChildrenMap: parent id -> direct children, as held by the node store
pub type ChildrenMap = HashMap<NodeId, Children>;

/// Identifier of the synthetic root whose children are the top-level nodes
pub const DEFAULT_ROOT_ID: &str = "categories";
