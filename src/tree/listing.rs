//! Single-level directory listings

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// Entry names at one directory level, each tagged with its kind.
///
/// Names are kept sorted so iteration (and therefore event order) is stable
/// across runs; membership is what matters for reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    entries: BTreeMap<OsString, EntryKind>,
}

impl DirectoryListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the immediate children of `dir`.
    ///
    /// Symbolic links are followed. A link whose target cannot be resolved is
    /// listed as a file so it can still be removed or replaced.
    pub fn read(dir: &Path) -> std::io::Result<Self> {
        let mut listing = Self::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(_) => fs::symlink_metadata(&path)?,
            };
            let kind = if metadata.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            listing.insert(entry.file_name(), kind);
        }

        Ok(listing)
    }

    pub fn insert(&mut self, name: impl Into<OsString>, kind: EntryKind) {
        self.entries.insert(name.into(), kind);
    }

    pub fn get(&self, name: &OsStr) -> Option<EntryKind> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, EntryKind)> {
        self.entries.iter().map(|(name, kind)| (name.as_os_str(), *kind))
    }
}

impl FromIterator<(OsString, EntryKind)> for DirectoryListing {
    fn from_iter<I: IntoIterator<Item = (OsString, EntryKind)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
