//! End-to-end reconciliation scenarios

use super::test_utils::{mkdir, snapshot, write, Pair};
use treemirror::fs::LocalFs;
use treemirror::sync::{ChangeKind, MemoryChangeLog, Reconciler};

/// Stale file deleted, nested digest mismatch updated, equal file left alone
#[test]
fn test_delete_update_and_unchanged() {
    let pair = Pair::new();
    write(&pair.source, "f1.txt", "hello");
    write(&pair.source, "sub/f2.txt", "x");
    write(&pair.replica, "f1.txt", "hello");
    write(&pair.replica, "f3.txt", "old");
    write(&pair.replica, "sub/f2.txt", "y");

    let log = MemoryChangeLog::new();
    let stats = Reconciler::new(LocalFs, &log)
        .sync(&pair.source, &pair.replica)
        .unwrap();

    assert_eq!(snapshot(&pair.replica), snapshot(&pair.source));
    assert_eq!(
        log.kinds(),
        vec![
            ChangeKind::Started,
            ChangeKind::Deleted {
                name: "f3.txt".into(),
                replica: pair.replica.join("f3.txt"),
            },
            ChangeKind::Updated {
                name: "f2.txt".into(),
                replica: pair.replica.join("sub").join("f2.txt"),
            },
            ChangeKind::Completed,
        ]
    );
    assert_eq!(stats.unchanged, 1);
    assert_eq!(stats.deleted, 1);
    assert_eq!(stats.updated, 1);
}

#[test]
fn test_empty_directories_only_bracket_events() {
    let pair = Pair::new();
    let log = MemoryChangeLog::new();

    let stats = Reconciler::new(LocalFs, &log)
        .sync(&pair.source, &pair.replica)
        .unwrap();

    assert_eq!(stats.actions(), 0);
    assert_eq!(log.kinds(), vec![ChangeKind::Started, ChangeKind::Completed]);
}

/// A missing directory is copied as one subtree with one event
#[test]
fn test_new_directory_copied_in_one_action() {
    let pair = Pair::new();
    write(&pair.source, "dir1/a.txt", "a");
    write(&pair.source, "dir1/b.txt", "b");
    write(&pair.source, "dir1/c.txt", "c");

    let log = MemoryChangeLog::new();
    let stats = Reconciler::new(LocalFs, &log)
        .sync(&pair.source, &pair.replica)
        .unwrap();

    assert_eq!(stats.copied, 1);
    assert_eq!(
        log.changes(),
        vec![ChangeKind::Copied {
            name: "dir1".into(),
            source: pair.source.join("dir1"),
            replica: pair.replica.join("dir1"),
        }]
    );
    assert_eq!(snapshot(&pair.replica), snapshot(&pair.source));
}

#[test]
fn test_deep_tree_mirrored_and_extras_removed() {
    let pair = Pair::new();
    write(&pair.source, "a/b/c/d/deep.txt", "deep");
    write(&pair.source, "a/b/keep.txt", "keep");
    mkdir(&pair.source, "a/empty");
    write(&pair.source, "root.bin", "\u{0}\u{1}\u{2}");

    mkdir(&pair.replica, "a/b");
    write(&pair.replica, "a/b/keep.txt", "stale");
    write(&pair.replica, "a/b/extra.txt", "extra");
    write(&pair.replica, "junk/nested/more.txt", "junk");

    let log = MemoryChangeLog::new();
    Reconciler::new(LocalFs, &log)
        .sync(&pair.source, &pair.replica)
        .unwrap();

    assert_eq!(snapshot(&pair.replica), snapshot(&pair.source));
    // Deleted directories are reported once, not per nested entry
    let deleted_junk = log
        .changes()
        .into_iter()
        .filter(|k| matches!(k, ChangeKind::Deleted { name, .. } if name == "junk"))
        .count();
    assert_eq!(deleted_junk, 1);
    assert!(!log
        .changes()
        .iter()
        .any(|k| matches!(k, ChangeKind::Deleted { name, .. } if name == "more.txt")));
}

#[test]
fn test_source_never_modified() {
    let pair = Pair::new();
    write(&pair.source, "x/y.txt", "y");
    write(&pair.source, "z.txt", "z");
    write(&pair.replica, "z.txt", "different");
    write(&pair.replica, "only_here.txt", "gone soon");
    let before = snapshot(&pair.source);

    Reconciler::new(LocalFs, MemoryChangeLog::new())
        .sync(&pair.source, &pair.replica)
        .unwrap();

    assert_eq!(snapshot(&pair.source), before);
}

#[test]
fn test_copied_files_keep_modification_time() {
    let pair = Pair::new();
    write(&pair.source, "t.txt", "timed");
    write(&pair.source, "d/inner.txt", "inner");

    Reconciler::new(LocalFs, MemoryChangeLog::new())
        .sync(&pair.source, &pair.replica)
        .unwrap();

    for rel in ["t.txt", "d/inner.txt"] {
        let src = std::fs::metadata(pair.source.join(rel)).unwrap();
        let dst = std::fs::metadata(pair.replica.join(rel)).unwrap();
        assert_eq!(src.modified().unwrap(), dst.modified().unwrap(), "{}", rel);
    }
}
