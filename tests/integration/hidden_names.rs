//! Dot-prefixed names, including ones shaped like copy staging directories,
//! are mirrored like any other entry

use super::test_utils::{snapshot, write, Pair};
use treemirror::fs::LocalFs;
use treemirror::sync::{ChangeKind, MemoryChangeLog, Reconciler};

fn assert_mirrored_and_stable(pair: &Pair) {
    let log = MemoryChangeLog::new();
    let reconciler = Reconciler::new(LocalFs, &log);

    for _ in 0..3 {
        reconciler.sync(&pair.source, &pair.replica).unwrap();
    }
    assert_eq!(snapshot(&pair.replica), snapshot(&pair.source));

    log.clear();
    let stats = reconciler.sync(&pair.source, &pair.replica).unwrap();
    assert_eq!(stats.actions(), 0);
    assert_eq!(log.kinds(), vec![ChangeKind::Started, ChangeKind::Completed]);
}

#[test]
fn test_file_with_staging_suffix_name() {
    let pair = Pair::new();
    write(&pair.source, "dir1/a.txt", "a");
    write(&pair.source, ".dir1.treemirror-partial", "just a file");

    assert_mirrored_and_stable(&pair);
}

#[test]
fn test_directory_with_staging_suffix_name() {
    let pair = Pair::new();
    write(&pair.source, "dir1/a.txt", "a");
    write(&pair.source, ".dir1.treemirror-partial/keep.txt", "keep");

    assert_mirrored_and_stable(&pair);
}

#[test]
fn test_entries_with_staging_prefix() {
    let pair = Pair::new();
    write(&pair.source, "dir1/a.txt", "a");
    write(&pair.source, ".treemirror-abc123", "file");
    write(&pair.source, ".treemirror-xyz/nested/b.txt", "b");
    write(&pair.source, ".hidden/c.txt", "c");

    assert_mirrored_and_stable(&pair);
}

#[test]
fn test_existing_replica_lookalike_is_reconciled_not_clobbered() {
    let pair = Pair::new();
    write(&pair.source, "dir1/a.txt", "a");
    write(&pair.source, ".dir1.treemirror-partial/keep.txt", "source");
    write(&pair.replica, ".dir1.treemirror-partial/keep.txt", "stale");

    let log = MemoryChangeLog::new();
    let stats = Reconciler::new(LocalFs, &log)
        .sync(&pair.source, &pair.replica)
        .unwrap();

    assert_eq!(stats.copied, 1);
    assert_eq!(stats.updated, 1);
    assert_eq!(snapshot(&pair.replica), snapshot(&pair.source));
}
