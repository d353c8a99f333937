//! Configuration System
//!
//! Layered configuration for the sync driver: merge-policy defaults, the
//! global config file, an explicit `--config` file, then `TREEMIRROR__*`
//! environment overrides. CLI flags are applied on top by the binary.

use crate::logging::LoggingConfig;
use crate::sync::ReconcilerOptions;
use crate::tree::digest::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreemirrorConfig {
    /// Reconciliation settings
    #[serde(default)]
    pub sync: SyncConfig,

    /// Diagnostic logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Reconciliation and driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Bytes read per chunk while hashing
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Skip hashing when file sizes differ
    #[serde(default = "default_true")]
    pub size_fast_path: bool,

    /// Create the replica root when missing
    #[serde(default = "default_true")]
    pub create_replica: bool,

    /// Echo change log lines to stdout
    #[serde(default = "default_true")]
    pub echo: bool,
}

/// Largest accepted hashing chunk, 64 MiB
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_true() -> bool {
    true
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            size_fast_path: default_true(),
            create_replica: default_true(),
            echo: default_true(),
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be at least 1 byte".to_string());
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(format!(
                "chunk_size {} exceeds the maximum of {} bytes",
                self.chunk_size, MAX_CHUNK_SIZE
            ));
        }
        Ok(())
    }

    pub fn reconciler_options(&self) -> ReconcilerOptions {
        ReconcilerOptions {
            chunk_size: self.chunk_size,
            size_fast_path: self.size_fast_path,
        }
    }
}

impl TreemirrorConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.sync.validate() {
            errors.push(format!("sync: {}", e));
        }

        let levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !levels.contains(&self.logging.level.as_str()) {
            errors.push(format!("logging: unknown level '{}'", self.logging.level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
