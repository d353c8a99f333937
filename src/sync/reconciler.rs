//! Tree diff and reconcile engine
//!
//! Makes a replica directory tree match a source tree, one directory level at
//! a time. Each level is listed, classified, and reconciled in a fixed order:
//!
//! 1. type-mismatched entries are removed and recreated with the source kind
//! 2. common files are replaced when their content digests differ
//! 3. entries only in the replica are deleted
//! 4. common directories are reconciled recursively
//! 5. entries only in the source are copied (directories as whole subtrees)
//!
//! The first failure aborts the level and every level above it. There is no
//! state between passes; a pass right after a successful one does nothing.
//!
//! Callers must not run two passes over the same replica concurrently.

use crate::error::SyncError;
use crate::fs::FsOps;
use crate::sync::events::{ChangeEvent, ChangeKind, ChangeLog};
use crate::tree::classify::classify;
use crate::tree::digest::{Digest, Digester};
use crate::tree::listing::EntryKind;
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info, instrument, trace};

/// Reconciler tuning
#[derive(Debug, Clone)]
pub struct ReconcilerOptions {
    /// Read size used when hashing files
    pub chunk_size: usize,
    /// Treat files of different length as changed without hashing them
    pub size_fast_path: bool,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            chunk_size: crate::tree::digest::DEFAULT_CHUNK_SIZE,
            size_fast_path: true,
        }
    }
}

/// Actions taken during one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Entries created from the source (a copied directory counts once)
    pub copied: usize,
    /// Files whose content was replaced, plus type conversions
    pub updated: usize,
    /// Replica entries removed
    pub deleted: usize,
    /// Common files found identical
    pub unchanged: usize,
}

impl SyncStats {
    /// Number of filesystem-changing actions
    pub fn actions(&self) -> usize {
        self.copied + self.updated + self.deleted
    }

    fn absorb(&mut self, other: SyncStats) {
        self.copied += other.copied;
        self.updated += other.updated;
        self.deleted += other.deleted;
        self.unchanged += other.unchanged;
    }
}

/// One-way tree reconciler over an `FsOps` backend, reporting to a `ChangeLog`
pub struct Reconciler<F, L> {
    fs: F,
    log: L,
    digester: Digester,
    size_fast_path: bool,
}

impl<F: FsOps, L: ChangeLog> Reconciler<F, L> {
    pub fn new(fs: F, log: L) -> Self {
        Self::with_options(fs, log, ReconcilerOptions::default())
    }

    pub fn with_options(fs: F, log: L, options: ReconcilerOptions) -> Self {
        Self {
            fs,
            log,
            digester: Digester::new(options.chunk_size),
            size_fast_path: options.size_fast_path,
        }
    }

    pub fn change_log(&self) -> &L {
        &self.log
    }

    /// Run one full pass from the top-level directory pair.
    ///
    /// Emits `Started` before any work and `Completed` only when every level
    /// succeeded.
    pub fn sync(&self, source: &Path, replica: &Path) -> Result<SyncStats, SyncError> {
        self.sync_dir(source, replica, true)
    }

    /// Reconcile one directory level.
    ///
    /// Lifecycle events are emitted only when `top_level` is set; nested calls
    /// report per-entry changes only.
    #[instrument(skip(self), level = "debug")]
    pub fn sync_dir(
        &self,
        source: &Path,
        replica: &Path,
        top_level: bool,
    ) -> Result<SyncStats, SyncError> {
        if top_level {
            info!(source = %source.display(), replica = %replica.display(), "Sync pass starting");
            self.emit(ChangeKind::Started);
        }

        let stats = self.reconcile_level(source, replica)?;

        if top_level {
            info!(
                copied = stats.copied,
                updated = stats.updated,
                deleted = stats.deleted,
                unchanged = stats.unchanged,
                "Sync pass complete"
            );
            self.emit(ChangeKind::Completed);
        }
        Ok(stats)
    }

    fn reconcile_level(&self, source: &Path, replica: &Path) -> Result<SyncStats, SyncError> {
        let source_listing = self
            .fs
            .list(source)
            .map_err(|e| SyncError::listing(source, e))?;
        let replica_listing = self
            .fs
            .list(replica)
            .map_err(|e| SyncError::listing(replica, e))?;
        let plan = classify(&source_listing, &replica_listing);
        trace!(
            ?plan,
            source_entries = source_listing.len(),
            replica_entries = replica_listing.len(),
            structurally_equal = plan.is_structurally_equal(),
            "Classified level"
        );

        let mut stats = SyncStats::default();

        for (name, source_kind) in &plan.type_mismatched {
            let src = source.join(name);
            let dst = replica.join(name);
            debug!(dst = %dst.display(), ?source_kind, "Converting entry kind");
            // Replica kind is the opposite of the source kind
            self.remove(&dst, opposite(*source_kind))?;
            self.create(&src, &dst, *source_kind)?;
            stats.updated += 1;
            self.emit(ChangeKind::Updated {
                name: display_name(name),
                replica: dst,
            });
        }

        for name in &plan.common_files {
            let src = source.join(name);
            let dst = replica.join(name);
            if self.files_equal(&src, &dst)? {
                stats.unchanged += 1;
                continue;
            }
            debug!(dst = %dst.display(), "Content differs, replacing");
            self.fs
                .remove_file(&dst)
                .map_err(|e| SyncError::delete(&dst, e))?;
            self.fs
                .copy_file(&src, &dst)
                .map_err(|e| SyncError::copy(&src, &dst, e))?;
            stats.updated += 1;
            self.emit(ChangeKind::Updated {
                name: display_name(name),
                replica: dst,
            });
        }

        for (name, replica_kind) in &plan.only_in_replica {
            let dst = replica.join(name);
            self.remove(&dst, *replica_kind)?;
            stats.deleted += 1;
            self.emit(ChangeKind::Deleted {
                name: display_name(name),
                replica: dst,
            });
        }

        for name in &plan.common_dirs {
            let nested = self.sync_dir(&source.join(name), &replica.join(name), false)?;
            stats.absorb(nested);
        }

        for (name, source_kind) in &plan.only_in_source {
            let src = source.join(name);
            let dst = replica.join(name);
            self.create(&src, &dst, *source_kind)?;
            stats.copied += 1;
            self.emit(ChangeKind::Copied {
                name: display_name(name),
                source: src,
                replica: dst,
            });
        }

        Ok(stats)
    }

    fn files_equal(&self, src: &Path, dst: &Path) -> Result<bool, SyncError> {
        if self.size_fast_path {
            let src_len = self
                .fs
                .file_len(src)
                .map_err(|e| SyncError::digest(src, e))?;
            let dst_len = self
                .fs
                .file_len(dst)
                .map_err(|e| SyncError::digest(dst, e))?;
            if src_len != dst_len {
                trace!(src_len, dst_len, "Sizes differ, skipping digest");
                return Ok(false);
            }
        }
        Ok(self.digest(src)? == self.digest(dst)?)
    }

    fn digest(&self, path: &Path) -> Result<Digest, SyncError> {
        let reader = self.fs.open(path).map_err(|e| SyncError::digest(path, e))?;
        self.digester
            .digest_reader(reader)
            .map_err(|e| SyncError::digest(path, e))
    }

    fn create(&self, src: &Path, dst: &Path, kind: EntryKind) -> Result<(), SyncError> {
        let result = match kind {
            EntryKind::File => self.fs.copy_file(src, dst),
            EntryKind::Directory => self.fs.copy_tree(src, dst),
        };
        result.map_err(|e| SyncError::copy(src, dst, e))
    }

    fn remove(&self, path: &Path, kind: EntryKind) -> Result<(), SyncError> {
        let result = match kind {
            EntryKind::File => self.fs.remove_file(path),
            EntryKind::Directory => self.fs.remove_tree(path),
        };
        result.map_err(|e| SyncError::delete(path, e))
    }

    fn emit(&self, kind: ChangeKind) {
        self.log.emit(ChangeEvent::now(kind));
    }
}

fn opposite(kind: EntryKind) -> EntryKind {
    match kind {
        EntryKind::File => EntryKind::Directory,
        EntryKind::Directory => EntryKind::File,
    }
}

fn display_name(name: &OsStr) -> String {
    name.to_string_lossy().into_owned()
}
