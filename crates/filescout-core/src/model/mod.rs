/// Data model — index records and the lazy directory tree.
pub mod record;
pub mod tree;

pub use record::{FileRecord, FOLDER_LABEL};
pub use tree::{DirNode, DirTree, NodeIndex, NodeKind};
