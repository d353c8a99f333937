//! Polling Driver
//!
//! Runs one reconciliation pass per interval. A failed pass is logged and
//! reported to the change log; the next scheduled pass is the retry.
//! Passes are strictly sequential, which is what keeps two passes from
//! racing on the same replica paths.

use crate::error::SyncError;
use crate::fs::FsOps;
use crate::sync::{ChangeEvent, ChangeKind, ChangeLog, Reconciler, SyncStats};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Driver configuration
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub source: PathBuf,
    pub replica: PathBuf,
    /// Pause between the end of one pass and the start of the next
    pub interval: Duration,
    /// Create the replica root when it does not exist
    pub create_replica: bool,
}

/// Outcome counters over a driver run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passes: u64,
    pub failed: u64,
    /// Stats of the most recent successful pass
    pub last: Option<SyncStats>,
}

pub struct Driver<F, L> {
    config: DriverConfig,
    reconciler: Reconciler<F, L>,
}

impl<F: FsOps, L: ChangeLog> Driver<F, L> {
    pub fn new(config: DriverConfig, reconciler: Reconciler<F, L>) -> Self {
        Self { config, reconciler }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Validate both roots before the first pass.
    ///
    /// The source must be an existing directory. A missing replica is created
    /// when allowed. The roots must not be the same directory or nested in
    /// each other.
    pub fn prepare(&self) -> Result<(), SyncError> {
        let source = &self.config.source;
        let replica = &self.config.replica;

        if !source.exists() {
            return Err(SyncError::invalid_root(source, "source does not exist"));
        }
        if !source.is_dir() {
            return Err(SyncError::invalid_root(source, "source is not a directory"));
        }

        if !replica.exists() {
            if !self.config.create_replica {
                return Err(SyncError::invalid_root(replica, "replica does not exist"));
            }
            std::fs::create_dir_all(replica).map_err(|e| {
                SyncError::invalid_root(replica, format!("cannot create replica: {}", e))
            })?;
            info!(replica = %replica.display(), "Created replica root");
        } else if !replica.is_dir() {
            return Err(SyncError::invalid_root(replica, "replica is not a directory"));
        }

        check_disjoint(source, replica)
    }

    /// Run a single pass, reporting an aborted pass to the change log
    pub fn run_pass(&self) -> Result<SyncStats, SyncError> {
        match self
            .reconciler
            .sync(&self.config.source, &self.config.replica)
        {
            Ok(stats) => Ok(stats),
            Err(e) => {
                error!(error = %e, "Sync pass aborted");
                self.reconciler.change_log().emit(ChangeEvent::now(ChangeKind::Aborted {
                    error: e.to_string(),
                }));
                Err(e)
            }
        }
    }

    /// Run passes until `max_passes` is reached, or forever when `None`.
    ///
    /// Pass failures do not stop the loop.
    pub fn run(&self, max_passes: Option<u64>) -> RunSummary {
        let mut summary = RunSummary::default();

        loop {
            summary.passes += 1;
            match self.run_pass() {
                Ok(stats) => summary.last = Some(stats),
                Err(_) => {
                    summary.failed += 1;
                    warn!(
                        retry_in_secs = self.config.interval.as_secs(),
                        "Will retry on next pass"
                    );
                }
            }

            if max_passes.is_some_and(|max| summary.passes >= max) {
                return summary;
            }
            std::thread::sleep(self.config.interval);
        }
    }
}

fn check_disjoint(source: &Path, replica: &Path) -> Result<(), SyncError> {
    let canonical_source = dunce::canonicalize(source)
        .map_err(|e| SyncError::invalid_root(source, format!("cannot resolve: {}", e)))?;
    let canonical_replica = dunce::canonicalize(replica)
        .map_err(|e| SyncError::invalid_root(replica, format!("cannot resolve: {}", e)))?;

    if canonical_source == canonical_replica {
        return Err(SyncError::invalid_root(
            replica,
            "source and replica are the same directory",
        ));
    }
    if canonical_replica.starts_with(&canonical_source) {
        return Err(SyncError::invalid_root(
            replica,
            "replica is inside the source tree",
        ));
    }
    if canonical_source.starts_with(&canonical_replica) {
        return Err(SyncError::invalid_root(
            replica,
            "source is inside the replica tree",
        ));
    }
    Ok(())
}
