//! Partition a source/replica listing pair into reconciliation categories

use crate::tree::listing::{DirectoryListing, EntryKind};
use std::ffi::OsString;

/// Disjoint categories of entry names at one directory level.
///
/// Every name from either listing lands in exactly one category. Each
/// category is sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Present only in the source, with the source kind
    pub only_in_source: Vec<(OsString, EntryKind)>,
    /// Present only in the replica, with the replica kind
    pub only_in_replica: Vec<(OsString, EntryKind)>,
    /// Files on both sides
    pub common_files: Vec<OsString>,
    /// Directories on both sides
    pub common_dirs: Vec<OsString>,
    /// Present on both sides with different kinds; carries the source kind
    pub type_mismatched: Vec<(OsString, EntryKind)>,
}

impl Classification {
    /// True when both listings hold the same names with the same kinds
    pub fn is_structurally_equal(&self) -> bool {
        self.only_in_source.is_empty()
            && self.only_in_replica.is_empty()
            && self.type_mismatched.is_empty()
    }
}

/// Classify the entries of a source listing against a replica listing
pub fn classify(source: &DirectoryListing, replica: &DirectoryListing) -> Classification {
    let mut out = Classification::default();

    for (name, source_kind) in source.iter() {
        match replica.get(name) {
            None => out.only_in_source.push((name.to_owned(), source_kind)),
            Some(replica_kind) if replica_kind != source_kind => {
                out.type_mismatched.push((name.to_owned(), source_kind))
            }
            Some(EntryKind::File) => out.common_files.push(name.to_owned()),
            Some(EntryKind::Directory) => out.common_dirs.push(name.to_owned()),
        }
    }

    for (name, replica_kind) in replica.iter() {
        if source.get(name).is_none() {
            out.only_in_replica.push((name.to_owned(), replica_kind));
        }
    }

    out
}
