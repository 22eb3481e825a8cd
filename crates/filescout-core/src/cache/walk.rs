/// Background subtree caching — runs the eager walk on a worker thread
/// with progress reporting and cooperative cancellation.
///
/// Caching a whole filesystem root can take minutes; doing it on the
/// calling thread would freeze any interactive consumer. The worker writes
/// into the same shared index as a synchronous walk, so lookups and
/// searches see partial progress immediately.
use super::progress::WalkProgress;
use super::CacheEngine;
use crossbeam_channel::Receiver;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::info;

/// Maximum number of progress messages that may queue up in the channel.
///
/// If the consumer falls behind, `send` blocks and the walk stalls briefly
/// rather than consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 1_024;

/// Handle to a running or completed background walk. Allows cancellation
/// and receiving progress updates.
pub struct WalkHandle {
    /// Receiver for progress updates from the walk thread.
    pub progress_rx: Receiver<WalkProgress>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the walk thread.
    _thread: Option<thread::JoinHandle<()>>,
}

impl WalkHandle {
    /// Request the walk to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Start caching `root`'s subtree on a background thread.
///
/// Returns a `WalkHandle` for receiving progress and requesting
/// cancellation; the records accumulate in `engine`'s shared index.
pub fn start_cache_walk(engine: CacheEngine, root: PathBuf) -> WalkHandle {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<WalkProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("filescout-walk".into())
        .spawn(move || {
            info!("caching subtree of {}", root.display());
            let start = Instant::now();

            let is_dir = engine.gateway().is_directory(&root);
            let stats =
                engine.cache_entry_cancellable(&root, is_dir, &cancel_clone, Some(&progress_tx));

            if stats.cancelled {
                let _ = progress_tx.send(WalkProgress::Cancelled);
            } else {
                let _ = progress_tx.send(WalkProgress::Complete {
                    stats,
                    duration: start.elapsed(),
                });
            }
        })
        .expect("failed to spawn walk thread");

    WalkHandle {
        progress_rx,
        cancel_flag,
        _thread: Some(thread),
    }
}
