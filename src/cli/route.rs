//! CLI route: run context built from parsed arguments and layered config.

use crate::cli::output::format_run_summary;
use crate::cli::parse::Cli;
use crate::config::{ConfigLoader, TreemirrorConfig};
use crate::driver::{Driver, DriverConfig};
use crate::error::ApiError;
use crate::fs::LocalFs;
use crate::logging::LoggingConfig;
use crate::sync::{FileChangeLog, Reconciler};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Resolved inputs for one invocation
pub struct RunContext {
    config: TreemirrorConfig,
    source: Option<PathBuf>,
    replica: Option<PathBuf>,
    interval: Option<Duration>,
    log_file: Option<PathBuf>,
    max_passes: Option<u64>,
    format: String,
    dump_config: bool,
}

impl RunContext {
    /// Load layered config and apply CLI overrides on top
    pub fn new(cli: &Cli) -> Result<Self, ApiError> {
        let mut config = ConfigLoader::load_with(cli.config.as_deref())?;
        apply_cli_overrides(&mut config, cli)?;

        config.validate().map_err(|errors| {
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            ))
        })?;

        Ok(Self {
            config,
            source: cli.source.clone(),
            replica: cli.replica.clone(),
            interval: cli.interval.map(Duration::from_secs),
            log_file: cli.log_file.clone(),
            max_passes: cli.max_passes(),
            format: cli.format.clone(),
            dump_config: cli.dump_config,
        })
    }

    pub fn config(&self) -> &TreemirrorConfig {
        &self.config
    }

    /// Run the requested command, returning text for stdout.
    ///
    /// An unbounded run only returns on a startup error.
    pub fn execute(&self) -> Result<String, ApiError> {
        if self.dump_config {
            return self
                .config
                .to_toml()
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)));
        }

        let (source, replica, interval, log_file) = match (
            &self.source,
            &self.replica,
            self.interval,
            &self.log_file,
        ) {
            (Some(s), Some(r), Some(i), Some(l)) => (s.clone(), r.clone(), i, l.clone()),
            _ => {
                return Err(ApiError::ConfigError(
                    "SOURCE, REPLICA, INTERVAL and LOG_FILE are required".to_string(),
                ))
            }
        };

        let change_log = FileChangeLog::open(log_file, self.config.sync.echo)?;
        let change_log_path = change_log.path().to_path_buf();
        let reconciler = Reconciler::with_options(
            LocalFs::new(),
            change_log,
            self.config.sync.reconciler_options(),
        );
        let driver = Driver::new(
            DriverConfig {
                source,
                replica,
                interval,
                create_replica: self.config.sync.create_replica,
            },
            reconciler,
        );

        driver.prepare()?;
        info!(
            source = %driver.config().source.display(),
            replica = %driver.config().replica.display(),
            change_log = %change_log_path.display(),
            interval_secs = interval.as_secs(),
            "Mirroring started"
        );

        let summary = driver.run(self.max_passes);
        format_run_summary(&summary, &self.format)
    }
}

fn apply_cli_overrides(config: &mut TreemirrorConfig, cli: &Cli) -> Result<(), ApiError> {
    if cli.no_echo {
        config.sync.echo = false;
    }
    if cli.no_create_replica {
        config.sync.create_replica = false;
    }
    if cli.no_size_fast_path {
        config.sync.size_fast_path = false;
    }
    if let Some(chunk_size) = cli.chunk_size {
        config.sync.chunk_size = usize::try_from(chunk_size).map_err(|_| {
            ApiError::ConfigError(format!(
                "--chunk-size {} does not fit in memory on this platform",
                chunk_size
            ))
        })?;
    }
    Ok(())
}

/// Build logging configuration from CLI args and the config file.
/// Precedence: CLI flags override config file override defaults.
pub fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = ConfigLoader::load_with(cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.diag_log_file {
        config.file = Some(file.clone());
        if cli.log_output.is_none() {
            config.output = "file".to_string();
        }
    }

    config
}
