//! Picker tree model

pub mod node;

pub use node::Node;
