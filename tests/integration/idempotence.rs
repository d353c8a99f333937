//! A second pass right after a successful one does nothing

use super::test_utils::{snapshot, write, Pair};
use treemirror::fs::LocalFs;
use treemirror::sync::{ChangeKind, MemoryChangeLog, Reconciler, ReconcilerOptions};

#[test]
fn test_second_pass_is_noop() {
    let pair = Pair::new();
    write(&pair.source, "a.txt", "a");
    write(&pair.source, "d1/b.txt", "b");
    write(&pair.source, "d1/d2/c.txt", "c");
    write(&pair.replica, "d1/stale.txt", "s");
    write(&pair.replica, "a.txt", "not a");
    write(&pair.replica, "d1/d2", "kind swap");

    let log = MemoryChangeLog::new();
    let reconciler = Reconciler::new(LocalFs, &log);

    let first = reconciler.sync(&pair.source, &pair.replica).unwrap();
    assert!(first.actions() > 0);
    let after_first = snapshot(&pair.replica);

    log.clear();
    let second = reconciler.sync(&pair.source, &pair.replica).unwrap();

    assert_eq!(second.actions(), 0);
    assert_eq!(log.kinds(), vec![ChangeKind::Started, ChangeKind::Completed]);
    assert_eq!(snapshot(&pair.replica), after_first);
}

#[test]
fn test_noop_regardless_of_fast_path() {
    let pair = Pair::new();
    write(&pair.source, "same.txt", "identical bytes");
    write(&pair.replica, "same.txt", "identical bytes");

    for size_fast_path in [true, false] {
        let options = ReconcilerOptions {
            chunk_size: 4,
            size_fast_path,
        };
        let stats = Reconciler::with_options(LocalFs, MemoryChangeLog::new(), options)
            .sync(&pair.source, &pair.replica)
            .unwrap();
        assert_eq!(stats.actions(), 0);
        assert_eq!(stats.unchanged, 1);
    }
}
