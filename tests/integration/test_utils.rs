//! Shared helpers: temp source/replica pairs, tree snapshots, and a
//! fault-injecting filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use treemirror::fs::{FsOps, LocalFs};
use treemirror::tree::listing::DirectoryListing;
use walkdir::WalkDir;

/// Source and replica roots under one temp dir
pub struct Pair {
    _temp: TempDir,
    pub source: PathBuf,
    pub replica: PathBuf,
}

impl Pair {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let replica = temp.path().join("replica");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&replica).unwrap();
        Self {
            _temp: temp,
            source,
            replica,
        }
    }
}

/// Write `content` at `root/rel`, creating parent directories
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn mkdir(root: &Path, rel: &str) {
    fs::create_dir_all(root.join(rel)).unwrap();
}

/// Snapshot entry: `None` for a directory, file content otherwise
pub type Snapshot = BTreeMap<String, Option<Vec<u8>>>;

/// Every entry under `root` keyed by relative path
pub fn snapshot(root: &Path) -> Snapshot {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let content = if e.file_type().is_dir() {
                None
            } else {
                Some(fs::read(e.path()).unwrap())
            };
            (rel, content)
        })
        .collect()
}

/// Operation a `FaultyFs` can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    List,
    Open,
    CopyFile,
    CopyTree,
    RemoveFile,
    RemoveTree,
}

/// `LocalFs` that fails one operation on paths ending with a given name
pub struct FaultyFs {
    pub op: Op,
    pub name: String,
}

impl FaultyFs {
    pub fn new(op: Op, name: &str) -> Self {
        Self {
            op,
            name: name.to_string(),
        }
    }

    fn check(&self, op: Op, path: &Path) -> io::Result<()> {
        if op == self.op && path.file_name().is_some_and(|n| n == self.name.as_str()) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("injected {:?} failure", op),
            ));
        }
        Ok(())
    }
}

impl FsOps for FaultyFs {
    fn list(&self, dir: &Path) -> io::Result<DirectoryListing> {
        self.check(Op::List, dir)?;
        LocalFs.list(dir)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        self.check(Op::Open, path)?;
        LocalFs.open(path)
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        LocalFs.file_len(path)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
        self.check(Op::CopyFile, dst)?;
        LocalFs.copy_file(src, dst)
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> io::Result<()> {
        self.check(Op::CopyTree, dst)?;
        LocalFs.copy_tree(src, dst)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.check(Op::RemoveFile, path)?;
        LocalFs.remove_file(path)
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        self.check(Op::RemoveTree, path)?;
        LocalFs.remove_tree(path)
    }
}
