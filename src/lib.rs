//! Treemirror: One-Way Directory Mirroring
//!
//! Periodically makes a replica directory tree identical to a source tree.
//! Files are compared by content digest, extraneous replica entries are
//! removed, and every structural change is written to a change log.

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod fs;
pub mod logging;
pub mod sync;
pub mod tree;
