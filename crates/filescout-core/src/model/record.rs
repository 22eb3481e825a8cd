/// A single filesystem entry known to the index.
///
/// Records are plain data: path, final name component, kind, and a derived
/// extension. They carry no live OS handles, which is what makes the index
/// trivially serializable across sessions.
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Display label used for directories wherever a file would show its
/// extension.
pub const FOLDER_LABEL: &str = "Folder";

/// One indexed filesystem entry.
///
/// `path` is the sole identity: inserting a record for an existing path
/// replaces the old record, and two records with the same path are the
/// same entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path — the unique key in the index.
    pub path: PathBuf,
    /// Final path component.
    pub name: CompactString,
    /// `true` for directories.
    pub is_dir: bool,
    /// Text after the last dot of `name`. `None` for directories and for
    /// dot-less file names. Original case is preserved; comparisons by
    /// consumers are case-insensitive.
    pub extension: Option<CompactString>,
}

impl FileRecord {
    /// Build a record for `path`, deriving `name` and `extension`.
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = record_name(&path);
        let extension = if is_dir { None } else { derive_extension(&name) };
        Self {
            path,
            name,
            is_dir,
            extension,
        }
    }

    /// The table-view detail column: derived extension for files (empty
    /// for dot-less names), the folder label for directories.
    pub fn detail_label(&self) -> &str {
        if self.is_dir {
            FOLDER_LABEL
        } else {
            self.extension.as_deref().unwrap_or("")
        }
    }
}

/// Final path component, or the path text itself for roots like `/` and
/// `C:\` that have no file name of their own.
fn record_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}

/// Everything after the last dot, if any. `"archive.tar.gz"` gives `gz`;
/// `"README"` gives nothing; a leading dot counts (`".bashrc"` gives
/// `bashrc`).
fn derive_extension(name: &str) -> Option<CompactString> {
    name.rsplit_once('.').map(|(_, ext)| CompactString::new(ext))
}
