/// Index persistence — whole-file JSON snapshots of plain records.
///
/// The on-disk format is an unversioned map of path → record. A record set
/// a newer build cannot read is silently discarded at load time rather than
/// migrated, so a first run and a first-run-after-format-change look
/// identical.
use crate::cache::Index;
use crate::error::PersistenceError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default index file name, resolved against the working directory.
pub const DEFAULT_INDEX_FILE: &str = "filescout_index.json";

/// Loads the index at startup and writes it back at shutdown.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default file name in the working directory.
    pub fn in_working_dir() -> Self {
        Self::new(DEFAULT_INDEX_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted index.
    ///
    /// A missing, unreadable, or malformed file yields an empty index; the
    /// failure is logged and never surfaced to the caller.
    pub fn load(&self) -> Index {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) => {
                debug!("no persisted index at {}: {err}", self.path.display());
                return Index::new();
            }
        };

        match serde_json::from_reader::<_, Index>(BufReader::new(file)) {
            Ok(index) => {
                debug!(
                    "loaded {} records from {}",
                    index.len(),
                    self.path.display()
                );
                index
            }
            Err(err) => {
                warn!(
                    "discarding malformed index file {}: {err}",
                    self.path.display()
                );
                Index::new()
            }
        }
    }

    /// Overwrite the persisted file with a snapshot of `index`.
    ///
    /// The writer is flushed before the handle closes on every exit path;
    /// there is no incremental or merge write. Callers log failures rather
    /// than propagating them to interactive paths.
    pub fn save(&self, index: &Index) -> Result<(), PersistenceError> {
        let file = File::create(&self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer(&mut writer, index).map_err(|source| PersistenceError::Format {
            path: self.path.clone(),
            source,
        })?;
        writer.flush().map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("saved {} records to {}", index.len(), self.path.display());
        Ok(())
    }
}
