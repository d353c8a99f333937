//! Merge rules: defaults, override order.

use crate::tree::digest::DEFAULT_CHUNK_SIZE;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("sync.chunk_size", DEFAULT_CHUNK_SIZE as u64)?
        .set_default("sync.size_fast_path", true)?
        .set_default("sync.create_replica", true)?
        .set_default("sync.echo", true)?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
