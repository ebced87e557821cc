//! Picktree: Lazy, Searchable, Tri-State Tree Picker
//!
//! Selection and traversal engine for a hierarchical multi-select picker whose
//! nodes are fetched lazily from a remote source. Covers lazy subtree
//! materialization, tri-state checkbox derivation, recursive prefix search
//! with path reconstruction and the flattened visible set used for keyboard
//! focus. Rendering and the backend are left to the host.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod generation;
pub mod loader;
pub mod logging;
pub mod navigator;
pub mod picker;
pub mod search;
pub mod selection;
pub mod source;
pub mod state;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod visible;

pub use error::PickerError;
pub use navigator::{Key, KeyOutcome};
pub use picker::Picker;
pub use search::SearchResults;
pub use selection::CheckState;
pub use source::{InMemorySource, NodeSource};
pub use tree::Node;
pub use types::{NodeId, DEFAULT_ROOT_ID};
pub use visible::VisibleRow;
