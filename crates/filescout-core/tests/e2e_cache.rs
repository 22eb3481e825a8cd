/// End-to-end cache and persistence integration tests.
///
/// These tests exercise the real background walk, the shared index, the
/// search layer, and the JSON store against a real temporary filesystem.
///
/// **Why a `tests/` integration test (not unit test)?**
///
/// The background walk spawns a real OS thread, writes to the shared
/// `Arc<RwLock<_>>` index, and enumerates actual directory entries. The
/// unit tests cover error injection through the in-memory gateway; this
/// suite proves the same code paths against the operating system with
/// zero mocking.
use filescout_core::cache::progress::WalkProgress;
use filescout_core::cache::walk::{start_cache_walk, WalkHandle, PROGRESS_CHANNEL_CAPACITY};
use filescout_core::cache::{CacheEngine, WalkStats};
use filescout_core::model::tree::DirTree;
use filescout_core::search::SearchService;
use filescout_core::store::IndexStore;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create a reproducible directory tree for cache tests:
///
/// ```text
/// root/
///   alpha/
///     a.txt
///     b.rs
///   beta/
///     c.png
///   d.zip
/// ```
fn build_test_tree(root: &Path) {
    let alpha = root.join("alpha");
    let beta = root.join("beta");
    fs::create_dir_all(&alpha).unwrap();
    fs::create_dir_all(&beta).unwrap();

    write_bytes(&alpha.join("a.txt"), 100);
    write_bytes(&alpha.join("b.rs"), 200);
    write_bytes(&beta.join("c.png"), 300);
    write_bytes(&root.join("d.zip"), 400);
}

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// Drain progress messages until the walk completes, returning the final
/// stats (or panicking after a generous timeout).
///
/// Waits up to 30 seconds — more than enough for any tmpdir walk on any CI
/// machine but short enough that a genuinely stuck test does not block the
/// suite indefinitely.
fn drain_to_completion(handle: &WalkHandle) -> WalkStats {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "walk did not complete within 30 seconds"
        );
        match handle.progress_rx.try_recv() {
            Ok(WalkProgress::Complete { stats, .. }) => return stats,
            Ok(WalkProgress::Cancelled) => panic!("walk was unexpectedly cancelled"),
            Ok(_) => continue,
            Err(crossbeam_channel::TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                panic!("walk channel disconnected before Complete was sent");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// The walk must cache the root, every directory, and every file.
#[test]
fn walk_caches_the_full_subtree() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let engine = CacheEngine::new();
    let handle = start_cache_walk(engine.clone(), tmp.path().to_path_buf());
    let stats = drain_to_completion(&handle);

    for rel in ["alpha", "beta", "alpha/a.txt", "alpha/b.rs", "beta/c.png", "d.zip"] {
        assert!(
            engine.lookup(&tmp.path().join(rel)).is_some(),
            "expected {rel} to be cached"
        );
    }
    assert!(engine.lookup(tmp.path()).is_some(), "root itself is cached");
    assert_eq!(stats.files, 4);
    assert_eq!(stats.dirs, 3); // root + alpha + beta
    assert_eq!(stats.errors, 0);
}

/// Walking an empty directory yields exactly the root record.
#[test]
fn walk_empty_directory() {
    let tmp = TempDir::new().expect("failed to create temp dir");

    let engine = CacheEngine::new();
    let handle = start_cache_walk(engine.clone(), tmp.path().to_path_buf());
    let stats = drain_to_completion(&handle);

    assert_eq!(engine.len(), 1);
    assert_eq!(stats.files, 0);
    assert_eq!(stats.dirs, 1);
}

/// Cancellation must end the walk gracefully with a terminal message.
#[test]
fn walk_cancellation_sends_terminal_message() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let engine = CacheEngine::new();
    let handle = start_cache_walk(engine, tmp.path().to_path_buf());
    // The walk may already be done by the time the flag is read, so we
    // accept either Cancelled or Complete.
    handle.cancel();

    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    let mut received_terminal = false;
    while std::time::Instant::now() < deadline {
        match handle.progress_rx.try_recv() {
            Ok(WalkProgress::Cancelled) | Ok(WalkProgress::Complete { .. }) => {
                received_terminal = true;
                break;
            }
            Ok(_) => continue,
            Err(crossbeam_channel::TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(5));
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => break,
        }
    }
    assert!(
        received_terminal,
        "walk must send Cancelled or Complete within 30 s"
    );
}

/// What the walk cached is immediately searchable, with kind filtering and
/// derived extensions intact.
#[test]
fn cached_entries_are_searchable() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let engine = CacheEngine::new();
    let handle = start_cache_walk(engine.clone(), tmp.path().to_path_buf());
    drain_to_completion(&handle);

    let service = SearchService::new(engine);

    let mut file_hits: Vec<_> = service
        .query(".", true, false)
        .into_iter()
        .map(|h| h.name.to_string())
        .collect();
    file_hits.sort();
    assert_eq!(file_hits, vec!["a.txt", "b.rs", "c.png", "d.zip"]);

    let dir_hits: Vec<_> = service
        .query("alpha", false, true)
        .into_iter()
        .map(|h| (h.name.to_string(), h.detail.to_string()))
        .collect();
    assert_eq!(dir_hits, vec![("alpha".to_string(), "Folder".to_string())]);
}

/// Full session round trip: walk, save, restart into a fresh engine, and
/// search the reloaded index without touching the filesystem again.
#[test]
fn persisted_index_survives_a_restart() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    let store = IndexStore::new(tmp.path().join("index.json"));

    // Session one: walk and persist at shutdown.
    {
        let engine = CacheEngine::new();
        let handle = start_cache_walk(engine.clone(), tmp.path().to_path_buf());
        drain_to_completion(&handle);

        let index = engine.shared_index();
        store.save(&index.read()).expect("save failed");
    }

    // Session two: load only. Records for files deleted meanwhile are
    // still present — stale entries are never evicted.
    fs::remove_file(tmp.path().join("d.zip")).unwrap();

    let engine = CacheEngine::new();
    engine.restore(store.load());
    assert!(engine.lookup(&tmp.path().join("alpha/a.txt")).is_some());
    assert!(
        engine.lookup(&tmp.path().join("d.zip")).is_some(),
        "deleted paths stay known until the file is overwritten wholesale"
    );

    let hits = SearchService::new(engine).query("a.txt", true, false);
    assert_eq!(hits.len(), 1);
}

/// Tree expansion against the real filesystem: directory children become
/// nodes, everything becomes searchable, and re-expansion is a no-op.
#[test]
fn tree_expansion_feeds_the_index() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let engine = CacheEngine::new();
    let mut tree = DirTree::new(&[tmp.path().to_path_buf()]);
    let root_node = tree.children(tree.root())[0];

    tree.expand(root_node, &engine);

    let labels: Vec<_> = tree
        .children(root_node)
        .iter()
        .map(|c| tree.label(*c).to_string())
        .collect();
    assert_eq!(labels, vec!["alpha", "beta"]);

    // Expansion cached the directory children eagerly, subtrees included.
    assert!(engine.lookup(&tmp.path().join("alpha/b.rs")).is_some());
    assert!(engine.lookup(&tmp.path().join("d.zip")).is_some());

    let before = tree.len();
    tree.expand(root_node, &engine);
    assert_eq!(tree.len(), before, "re-expansion must not grow the arena");
}

/// `PROGRESS_CHANNEL_CAPACITY` must be positive so `send()` can never
/// block immediately. Compile-time invariant.
const _: () = assert!(
    PROGRESS_CHANNEL_CAPACITY > 0,
    "PROGRESS_CHANNEL_CAPACITY must be > 0"
);
