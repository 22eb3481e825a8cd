/// Walk progress reporting — lightweight messages sent from a background
/// cache walk to its consumer via a crossbeam channel.
///
/// The actual records land in the shared index as the walk runs; these
/// messages carry only counters and status flags.
use super::WalkStats;
use std::path::PathBuf;
use std::time::Duration;

/// Progress updates emitted by a background cache walk.
#[derive(Debug)]
pub enum WalkProgress {
    /// Periodic update with running totals.
    Update {
        files: u64,
        dirs: u64,
        current_path: PathBuf,
    },
    /// A non-fatal error (e.g. permission denied on one directory).
    Error { path: PathBuf, message: String },
    /// The walk finished; final counters and wall-clock duration.
    /// All records are already in the shared index.
    Complete {
        stats: WalkStats,
        duration: Duration,
    },
    /// The walk was cancelled before completion.
    Cancelled,
}
