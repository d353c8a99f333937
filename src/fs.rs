//! Filesystem primitives used by the reconciler
//!
//! `FsOps` is the seam between the reconciliation engine and the disk:
//! listing, reading for digests, file and subtree copies, and removal.
//! `LocalFs` is the implementation backed by `std::fs`.

use crate::tree::listing::DirectoryListing;
use std::fs::{self, File, FileTimes};
use std::io::{self, Read};
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Name prefix of the staging directory a subtree copy is built in
pub const STAGING_PREFIX: &str = ".treemirror-";

/// Filesystem operations consumed by the reconciler.
///
/// Implementations must leave the destination of a failed `copy_tree`
/// absent; failed file copies may leave the destination undefined.
pub trait FsOps {
    /// List the immediate children of `dir` with their kinds
    fn list(&self, dir: &Path) -> io::Result<DirectoryListing>;

    /// Open a file for streaming its content
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Length of the file at `path` in bytes
    fn file_len(&self, path: &Path) -> io::Result<u64>;

    /// Copy file bytes, permissions and modification time
    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Copy a whole directory subtree onto a path that does not exist yet
    fn copy_tree(&self, src: &Path, dst: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn remove_tree(&self, path: &Path) -> io::Result<()>;
}

/// `FsOps` over the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FsOps for LocalFs {
    fn list(&self, dir: &Path) -> io::Result<DirectoryListing> {
        DirectoryListing::read(dir)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
        fs::copy(src, dst)?;
        preserve_mtime(src, dst)
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> io::Result<()> {
        let staging = staging_dir(dst)?;
        // Built one level down so the subtree root gets ordinary permissions
        let built = staging.path().join("tree");

        let result = copy_tree_into(src, &built).and_then(|()| fs::rename(&built, dst));
        let path = staging.path().to_path_buf();
        if let Err(cleanup) = staging.close() {
            warn!(
                staging = %path.display(),
                error = %cleanup,
                "Failed to remove subtree staging directory"
            );
        }
        result?;

        debug!(src = %src.display(), dst = %dst.display(), "Subtree copied");
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

/// Fresh hidden directory next to `dst` to assemble a subtree in.
///
/// The name is unique and created exclusively, so an existing entry is never
/// reused or removed.
fn staging_dir(dst: &Path) -> io::Result<TempDir> {
    let parent = dst
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if dst.file_name().is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Copy destination has no file name: {}", dst.display()),
        ));
    }
    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)
}

fn copy_tree_into(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf);
            e.into_io_error().unwrap_or_else(|| {
                io::Error::new(
                    io::ErrorKind::Other,
                    format!("Filesystem loop while copying {:?}", path),
                )
            })
        })?;

        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            preserve_mtime(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn preserve_mtime(src: &Path, dst: &Path) -> io::Result<()> {
    let modified = fs::metadata(src)?.modified()?;
    // Read-only copies can still have their times set by the owner
    let file = File::options().write(true).open(dst).or_else(|e| {
        trace!(path = %dst.display(), error = %e, "Write open failed, setting times read-only");
        File::open(dst)
    })?;
    file.set_times(FileTimes::new().set_modified(modified))
}
