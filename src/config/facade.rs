//! Config loading facade over the `config` crate.

use super::merge::merge_policy;
use super::sources::{env, explicit_file, global_file};
use super::TreemirrorConfig;
use config::ConfigError;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file, an optional explicit file, then environment overrides
    pub fn load_with(explicit: Option<&Path>) -> Result<TreemirrorConfig, ConfigError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        if let Some(path) = explicit {
            builder = explicit_file::add_to_builder(builder, path)?;
        }
        builder = env::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }
}
