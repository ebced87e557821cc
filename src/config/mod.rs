//! Configuration
//!
//! Layered picker configuration: built-in defaults, the global config file,
//! an explicit config file, then `PICKTREE__*` environment variables.

pub mod facade;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::source::memory::DEFAULT_MAX_PATH_DEPTH;
use crate::types::DEFAULT_ROOT_ID;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_root_id() -> String {
    DEFAULT_ROOT_ID.to_string()
}

fn default_max_path_depth() -> usize {
    DEFAULT_MAX_PATH_DEPTH
}

fn default_min_query_len() -> usize {
    1
}

/// Top-level picker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Id of the synthetic root whose children are the top-level nodes
    #[serde(default = "default_root_id")]
    pub root_id: String,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            root_id: default_root_id(),
            source: SourceConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where nodes come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// JSON dataset of the form `{ "<parent id>": [node, ...] }`
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    /// Simulated latency per source call, in milliseconds
    #[serde(default)]
    pub latency_ms: u64,

    /// Bound on parent-chain length when resolving paths
    #[serde(default = "default_max_path_depth")]
    pub max_path_depth: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            latency_ms: 0,
            max_path_depth: default_max_path_depth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Trimmed queries shorter than this leave the picker in tree view
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
        }
    }
}
