//! Tooling Layer
//!
//! Command-line driver and text rendering for exercising the picker engine
//! against a dataset file.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
