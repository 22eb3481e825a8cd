/// Error taxonomy for filesystem enumeration and index persistence.
///
/// Every variant is recovered locally by its caller: gateway failures
/// shrink to "zero children" during traversal, persistence failures shrink
/// to an empty index at load time. Nothing in this crate surfaces these as
/// a hard failure on an interactive path.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failure while enumerating the filesystem through a gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Permission was denied while listing or probing `path`.
    #[error("access denied: {}", .path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `path` vanished between discovery and enumeration.
    #[error("not found: {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure. Callers treat it exactly like the variants
    /// above: skip the subtree, keep walking.
    #[error("io error on {}", .path.display())]
    Other {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GatewayError {
    /// Normalize a raw `io::Error` into the taxonomy.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::AccessDenied { path, source },
            io::ErrorKind::NotFound => Self::NotFound { path, source },
            _ => Self::Other { path, source },
        }
    }

    /// The path the failed operation was addressing.
    pub fn path(&self) -> &Path {
        match self {
            Self::AccessDenied { path, .. } | Self::NotFound { path, .. } | Self::Other { path, .. } => path,
        }
    }
}

/// A failure while loading or saving the persisted index file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The index file could not be opened, written, or flushed.
    #[error("index file io error: {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The index file exists but does not parse as a record map.
    #[error("index file malformed: {}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_normalize_by_kind() {
        let p = Path::new("/probe");
        let denied = GatewayError::from_io(p, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, GatewayError::AccessDenied { .. }));

        let missing = GatewayError::from_io(p, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(missing, GatewayError::NotFound { .. }));

        let other = GatewayError::from_io(p, io::Error::from(io::ErrorKind::TimedOut));
        assert!(matches!(other, GatewayError::Other { .. }));
        assert_eq!(other.path(), p);
    }
}
