/// Substring search over the cached index.
///
/// The search layer never touches the filesystem: only entries already
/// cached by an expansion or a walk are searchable. Reachability gates
/// searchability.
use crate::cache::CacheEngine;
use crate::model::record::FileRecord;
use compact_str::CompactString;

/// One result row: entry name plus its extension (files, empty when the
/// name has no dot) or the folder label (directories).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: CompactString,
    pub detail: CompactString,
}

impl SearchHit {
    pub fn from_record(record: &FileRecord) -> Self {
        Self {
            name: record.name.clone(),
            detail: CompactString::new(record.detail_label()),
        }
    }
}

/// Stateless query layer over a [`CacheEngine`] clone.
#[derive(Clone)]
pub struct SearchService {
    engine: CacheEngine,
}

impl SearchService {
    pub fn new(engine: CacheEngine) -> Self {
        Self { engine }
    }

    /// Case-insensitive substring match of `text` against record names,
    /// filtered by kind.
    ///
    /// An empty `text` matches every record passing the kind filter; both
    /// flags false yields nothing. Hit order follows the index snapshot:
    /// deterministic for a fixed snapshot and fixed inputs, otherwise
    /// unspecified.
    pub fn query(&self, text: &str, include_files: bool, include_dirs: bool) -> Vec<SearchHit> {
        if !include_files && !include_dirs {
            return Vec::new();
        }

        let needle = text.to_lowercase();
        self.engine
            .snapshot()
            .iter()
            .filter(|record| {
                if record.is_dir {
                    include_dirs
                } else {
                    include_files
                }
            })
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .map(SearchHit::from_record)
            .collect()
    }
}
