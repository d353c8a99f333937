//! One-way synchronization of a replica tree from a source tree.

pub mod events;
pub mod reconciler;

pub use events::{
    ChangeEvent, ChangeKind, ChangeLog, EventLevel, FileChangeLog, MemoryChangeLog,
};
pub use reconciler::{Reconciler, ReconcilerOptions, SyncStats};
