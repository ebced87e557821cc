//! Environment variable source: PICKTREE_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `PICKTREE__SOURCE__LATENCY_MS=250` sets `source.latency_ms`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("PICKTREE")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
