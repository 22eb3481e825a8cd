/// Filesystem access boundary.
///
/// `FilesystemGateway` is the only seam through which the crate touches the
/// OS filesystem. It carries no logic beyond error normalization, which
/// keeps the cache walk and the tree model testable against an in-memory
/// implementation.
use crate::error::GatewayError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// Absolute path of the child.
    pub path: PathBuf,
    /// `true` if the child is itself a directory.
    pub is_dir: bool,
}

/// Thin abstraction over "list immediate children" and directory probes.
pub trait FilesystemGateway: Send + Sync {
    /// List the immediate children of `path`, in name order.
    ///
    /// Failures are normalized into [`GatewayError`]; callers treat every
    /// variant as "zero children" rather than propagating it, because a
    /// directory can disappear or become unreadable between listing and
    /// traversal.
    fn list_children(&self, path: &Path) -> Result<Vec<ChildEntry>, GatewayError>;

    /// Whether `path` currently names a directory.
    fn is_directory(&self, path: &Path) -> bool;

    /// Whether `path` currently exists at all.
    fn exists(&self, path: &Path) -> bool;

    /// Resolve `path` to its canonical form for cycle detection.
    ///
    /// `None` when resolution fails; callers fall back to the unresolved
    /// path. The default is the identity, which is correct for gateways
    /// whose namespace has no links.
    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        Some(path.to_path_buf())
    }
}

/// Gateway backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsGateway;

impl FilesystemGateway for OsGateway {
    fn list_children(&self, path: &Path) -> Result<Vec<ChildEntry>, GatewayError> {
        let read_dir = fs::read_dir(path).map_err(|e| GatewayError::from_io(path, e))?;

        let mut children = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    debug!("skipping unreadable entry under {}: {err}", path.display());
                    continue;
                }
            };
            // file_type() comes for free from the directory read on most
            // platforms; a broken symlink is recorded as a non-directory.
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            children.push(ChildEntry {
                path: entry.path(),
                is_dir,
            });
        }

        // read_dir order is OS-defined; sort so expansion is deterministic.
        children.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(children)
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        fs::canonicalize(path).ok()
    }
}
