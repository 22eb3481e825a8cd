/// Filesystem root enumeration.
///
/// Feeds the synthetic tree root: one entry per drive on Windows, the
/// single `/` root everywhere else.
use std::path::PathBuf;

/// All filesystem roots present on this machine.
///
/// On Windows every drive letter is probed for existence; network shares
/// without a letter are not enumerated.
#[cfg(windows)]
pub fn filesystem_roots() -> Vec<PathBuf> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|root| root.exists())
        .collect()
}

/// All filesystem roots present on this machine.
#[cfg(not(windows))]
pub fn filesystem_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("/")]
}
