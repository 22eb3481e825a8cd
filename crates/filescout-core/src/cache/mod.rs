/// Cache engine — the in-memory index and the eager subtree walk that
/// fills it.
///
/// Caching is eager on first touch: the moment a directory is cached, its
/// entire subtree is walked and indexed. That trades upfront I/O for O(1)
/// repeated lookups and makes search results independent of which parts of
/// the tree are currently expanded.
///
/// # Locking discipline
///
/// The index lives behind a shared `RwLock`. The walk batches all records
/// of one directory listing under a single short write-lock acquisition and
/// never holds the lock across a filesystem call, so concurrent lookups and
/// searches observe partial progress instead of blocking for the whole
/// walk.
pub mod progress;
pub mod walk;

use crate::error::GatewayError;
use crate::fs::{FilesystemGateway, OsGateway};
use crate::model::record::FileRecord;
use crossbeam_channel::Sender;
use parking_lot::RwLock;
use progress::WalkProgress;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Path → record mapping, the search substrate.
///
/// Grows monotonically during a session: entries are never evicted, so a
/// path deleted from disk stays known to lookup and search until the
/// persisted file is overwritten wholesale.
pub type Index = HashMap<PathBuf, FileRecord>;

/// Shared, concurrently-readable index.
pub type SharedIndex = Arc<RwLock<Index>>;

/// Maximum directory depth the eager walk will descend.
///
/// A bound on pathological nesting; real trees stay far below it.
pub const MAX_WALK_DEPTH: usize = 128;

/// Directories walked between two progress messages.
const UPDATE_EVERY_DIRS: u64 = 100;

/// Counters accumulated over one `cache_entry` walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    /// File records inserted (including overwrites).
    pub files: u64,
    /// Directory records inserted (including overwrites).
    pub dirs: u64,
    /// Subtrees skipped because their listing failed.
    pub errors: u64,
    /// `true` when the depth budget or the cycle guard cut a subtree off.
    pub truncated: bool,
    /// `true` when the walk stopped on a cancellation request.
    pub cancelled: bool,
}

/// Owns the index and performs eager subtree caching.
///
/// Cloning is cheap (two `Arc`s); every consumer that needs the index — the
/// tree model, the search service, the persistence layer — holds its own
/// clone of one engine created at startup.
#[derive(Clone)]
pub struct CacheEngine {
    index: SharedIndex,
    gateway: Arc<dyn FilesystemGateway>,
}

impl Default for CacheEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheEngine {
    /// Engine over the real filesystem with an empty index.
    pub fn new() -> Self {
        Self::with_gateway(Arc::new(OsGateway))
    }

    /// Engine over an arbitrary gateway, e.g. an in-memory one in tests.
    pub fn with_gateway(gateway: Arc<dyn FilesystemGateway>) -> Self {
        Self {
            index: Arc::new(RwLock::new(Index::new())),
            gateway,
        }
    }

    /// The gateway this engine enumerates through.
    pub fn gateway(&self) -> &dyn FilesystemGateway {
        &*self.gateway
    }

    /// Handle to the shared index, e.g. for the persistence layer.
    pub fn shared_index(&self) -> SharedIndex {
        self.index.clone()
    }

    /// Replace the index contents with a previously persisted snapshot.
    pub fn restore(&self, index: Index) {
        *self.index.write() = index;
    }

    /// Insert or overwrite one record. The path is the sole identity, so
    /// the later write wins.
    pub fn insert(&self, record: FileRecord) {
        self.index.write().insert(record.path.clone(), record);
    }

    /// The record for `path`, if it has ever been cached.
    pub fn lookup(&self, path: &Path) -> Option<FileRecord> {
        self.index.read().get(path).cloned()
    }

    /// Point-in-time copy of every record. Restartable and independent of
    /// later mutation; the search layer iterates this instead of the live
    /// map.
    pub fn snapshot(&self) -> Vec<FileRecord> {
        self.index.read().values().cloned().collect()
    }

    /// Cached records directly under `dir` — the "current directory" feed
    /// for a table view.
    pub fn entries_in(&self, dir: &Path) -> Vec<FileRecord> {
        self.index
            .read()
            .values()
            .filter(|r| r.path.parent() == Some(dir))
            .cloned()
            .collect()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    /// Returns `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// Cache `path` and, for directories, its entire subtree.
    ///
    /// The walk is an eager depth-first traversal through the gateway.
    /// Listing failures skip the offending subtree and the walk continues
    /// with its siblings; the caller only sees the error counter.
    pub fn cache_entry(&self, path: &Path, is_dir: bool) -> WalkStats {
        let cancel = AtomicBool::new(false);
        self.cache_entry_cancellable(path, is_dir, &cancel, None)
    }

    /// As [`CacheEngine::cache_entry`], checking `cancel` before each
    /// directory listing so an unbounded walk can be stopped cooperatively.
    /// Progress messages go to `progress` when present.
    pub fn cache_entry_cancellable(
        &self,
        path: &Path,
        is_dir: bool,
        cancel: &AtomicBool,
        progress: Option<&Sender<WalkProgress>>,
    ) -> WalkStats {
        let mut ctx = WalkContext {
            visited: HashSet::new(),
            stats: WalkStats::default(),
            dirs_since_update: 0,
            cancel,
            progress,
        };

        self.insert(FileRecord::new(path.to_path_buf(), is_dir));
        if is_dir {
            ctx.stats.dirs += 1;
            self.walk_dir(path, 0, &mut ctx);
        } else {
            ctx.stats.files += 1;
        }
        ctx.stats
    }

    /// One level of the eager walk: list `path`, insert every child record
    /// under a single write lock, recurse into directory children.
    fn walk_dir(&self, path: &Path, depth: usize, ctx: &mut WalkContext<'_>) {
        if ctx.cancel.load(Ordering::Relaxed) {
            ctx.stats.cancelled = true;
            return;
        }
        if depth >= MAX_WALK_DEPTH {
            warn!("walk depth budget reached at {}", path.display());
            ctx.stats.truncated = true;
            return;
        }

        // Cycle guard: key on the resolved path so a symlinked re-entry of
        // an already-walked directory stops here instead of recursing
        // forever.
        let resolved = self
            .gateway
            .canonicalize(path)
            .unwrap_or_else(|| path.to_path_buf());
        if !ctx.visited.insert(resolved) {
            debug!("walk revisited {}, skipping", path.display());
            ctx.stats.truncated = true;
            return;
        }

        let children = match self.gateway.list_children(path) {
            Ok(children) => children,
            Err(err) => {
                debug!("walk skipping unreadable directory: {err}");
                ctx.stats.errors += 1;
                ctx.report_error(&err);
                return;
            }
        };

        // One short write lock for the whole listing; never held across
        // a filesystem call.
        {
            let mut index = self.index.write();
            for child in &children {
                let record = FileRecord::new(child.path.clone(), child.is_dir);
                index.insert(record.path.clone(), record);
            }
        }
        for child in &children {
            if child.is_dir {
                ctx.stats.dirs += 1;
            } else {
                ctx.stats.files += 1;
            }
        }
        ctx.report_update(path);

        for child in &children {
            if child.is_dir {
                self.walk_dir(&child.path, depth + 1, ctx);
                if ctx.stats.cancelled {
                    return;
                }
            }
        }
    }
}

/// Per-walk bookkeeping threaded through the recursion.
struct WalkContext<'a> {
    /// Canonical paths of directories already walked.
    visited: HashSet<PathBuf>,
    stats: WalkStats,
    dirs_since_update: u64,
    cancel: &'a AtomicBool,
    progress: Option<&'a Sender<WalkProgress>>,
}

impl WalkContext<'_> {
    fn report_error(&self, err: &GatewayError) {
        if let Some(tx) = self.progress {
            let _ = tx.send(WalkProgress::Error {
                path: err.path().to_path_buf(),
                message: err.to_string(),
            });
        }
    }

    fn report_update(&mut self, current: &Path) {
        self.dirs_since_update += 1;
        if self.dirs_since_update < UPDATE_EVERY_DIRS {
            return;
        }
        self.dirs_since_update = 0;
        if let Some(tx) = self.progress {
            let _ = tx.send(WalkProgress::Update {
                files: self.stats.files,
                dirs: self.stats.dirs,
                current_path: current.to_path_buf(),
            });
        }
    }
}
