//! ConfigLoader facade composing the configuration sources.

use super::sources::{environment, global_file};
use super::PickerConfig;
use config::{Config, ConfigError, File};
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    /// Precedence: global file (lowest) -> `config_file` -> environment (highest).
    pub fn load(config_file: Option<&Path>) -> Result<PickerConfig, ConfigError> {
        let builder = Config::builder();
        let builder = global_file::add_to_builder(builder)?;
        let builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load configuration from a specific file only, with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<PickerConfig, ConfigError> {
        let builder = Config::builder().add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Create default configuration.
    pub fn default() -> PickerConfig {
        PickerConfig::default()
    }
}
