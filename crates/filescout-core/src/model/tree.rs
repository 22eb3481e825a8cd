/// Lazy directory tree backing the navigation view.
///
/// All nodes live in a single `Vec<DirNode>` arena addressed by `NodeIndex`
/// (a thin `u32` wrapper), so the tree is cheap to grow and needs no
/// reference counting. Every directory node starts `Unexpanded` with one
/// synthetic placeholder child; its real children are materialized the
/// first time a consumer expands it, and expanding also feeds the cache
/// engine so the whole subtree becomes searchable.
use crate::cache::CacheEngine;
use crate::model::record::FOLDER_LABEL;
use crate::search::SearchHit;
use compact_str::CompactString;
use std::path::PathBuf;
use tracing::debug;

/// Label of the synthetic root above all filesystem roots.
pub const ROOT_LABEL: &str = "This PC";

/// Label shown for the synthetic child of a not-yet-expanded directory.
pub const PLACEHOLDER_LABEL: &str = "Loading...";

/// Lightweight index into the arena `Vec<DirNode>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a new `NodeIndex` from a `usize`, panicking in debug builds
    /// if it exceeds `u32::MAX`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a tree node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The synthetic root above all filesystem roots.
    Root,
    /// A real directory on disk. The tree only navigates directories;
    /// files exist solely in the index.
    Dir(PathBuf),
    /// Synthetic "not yet loaded" marker owned by an unexpanded directory.
    Placeholder,
}

/// A single node in the arena-allocated directory tree.
#[derive(Debug, Clone)]
pub struct DirNode {
    pub kind: NodeKind,
    /// `false` until the node has been materialized. Terminal once `true`.
    pub expanded: bool,
    /// Index of the parent node. `None` only for the synthetic root.
    pub parent: Option<NodeIndex>,
    /// Child nodes in listing order. Exactly one placeholder while
    /// unexpanded.
    pub children: Vec<NodeIndex>,
}

/// The navigable directory hierarchy.
///
/// Nodes are never destroyed during a session; collapsing a branch in a
/// view does not evict its children, and re-expanding an expanded node is
/// a no-op.
pub struct DirTree {
    nodes: Vec<DirNode>,
    root: NodeIndex,
}

impl DirTree {
    /// Build the tree: the synthetic root plus one unexpanded child per
    /// filesystem root. The root itself is born expanded.
    pub fn new(roots: &[PathBuf]) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeIndex::new(0),
        };
        let root = tree.add_node(DirNode {
            kind: NodeKind::Root,
            expanded: true,
            parent: None,
            children: Vec::new(),
        });
        tree.root = root;
        for path in roots {
            tree.add_dir_child(root, path.clone());
        }
        tree
    }

    /// Index of the synthetic root.
    #[inline]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Get the node at the given index.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &DirNode {
        &self.nodes[index.idx()]
    }

    /// Direct children of a node, in listing order.
    #[inline]
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.nodes[index.idx()].children
    }

    /// Total number of nodes in the arena, placeholders included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Display label: the sentinel for the root, the placeholder text for
    /// placeholders, otherwise the final path component (or the path text
    /// itself for roots like `/` and `C:\`).
    pub fn label(&self, index: NodeIndex) -> CompactString {
        match &self.nodes[index.idx()].kind {
            NodeKind::Root => CompactString::new(ROOT_LABEL),
            NodeKind::Placeholder => CompactString::new(PLACEHOLDER_LABEL),
            NodeKind::Dir(path) => match path.file_name() {
                Some(name) => CompactString::new(name.to_string_lossy()),
                None => CompactString::new(path.to_string_lossy()),
            },
        }
    }

    /// Materialize `index`'s real children.
    ///
    /// Idempotent: an already-expanded node (and the pre-expanded root) is
    /// left untouched and no filesystem call is made. A failed or empty
    /// listing still marks the node expanded, with zero children and no
    /// automatic retry.
    ///
    /// Every listed child is handed to the cache engine — recursively for
    /// directories — so expansion makes the whole subtree searchable.
    /// Only directory children become tree nodes.
    pub fn expand(&mut self, index: NodeIndex, engine: &CacheEngine) {
        let path = match &self.nodes[index.idx()] {
            node if node.expanded => return,
            node => match &node.kind {
                NodeKind::Dir(path) => path.clone(),
                // Placeholders have nothing to list.
                _ => return,
            },
        };

        // Drop the placeholder from the child list. The arena slot stays
        // allocated; nodes are never destroyed during a session.
        let kept: Vec<NodeIndex> = self.nodes[index.idx()]
            .children
            .iter()
            .copied()
            .filter(|c| !matches!(self.nodes[c.idx()].kind, NodeKind::Placeholder))
            .collect();
        self.nodes[index.idx()].children = kept;

        let children = match engine.gateway().list_children(&path) {
            Ok(children) => children,
            Err(err) => {
                debug!("expand treating failed listing as empty: {err}");
                Vec::new()
            }
        };

        for child in children {
            engine.cache_entry(&child.path, child.is_dir);
            if child.is_dir {
                self.add_dir_child(index, child.path);
            }
        }
        self.nodes[index.idx()].expanded = true;
    }

    /// The "current directory" rows a table view shows for this node:
    /// expand if needed, then one row per direct child with the derived
    /// extension or the folder label. For the synthetic root the rows are
    /// the filesystem roots themselves.
    pub fn listing(&mut self, index: NodeIndex, engine: &CacheEngine) -> Vec<SearchHit> {
        self.expand(index, engine);
        match &self.nodes[index.idx()].kind {
            NodeKind::Dir(path) => {
                let path = path.clone();
                engine
                    .entries_in(&path)
                    .iter()
                    .map(SearchHit::from_record)
                    .collect()
            }
            NodeKind::Root => self
                .children(index)
                .iter()
                .map(|child| SearchHit {
                    name: self.label(*child),
                    detail: CompactString::new(FOLDER_LABEL),
                })
                .collect(),
            NodeKind::Placeholder => Vec::new(),
        }
    }

    /// Allocate a new node in the arena and return its index.
    fn add_node(&mut self, node: DirNode) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        self.nodes.push(node);
        index
    }

    /// New unexpanded directory node under `parent`, with its own
    /// placeholder child already attached.
    fn add_dir_child(&mut self, parent: NodeIndex, path: PathBuf) -> NodeIndex {
        let index = self.add_node(DirNode {
            kind: NodeKind::Dir(path),
            expanded: false,
            parent: Some(parent),
            children: Vec::new(),
        });
        let placeholder = self.add_node(DirNode {
            kind: NodeKind::Placeholder,
            expanded: false,
            parent: Some(index),
            children: Vec::new(),
        });
        self.nodes[index.idx()].children.push(placeholder);
        self.nodes[parent.idx()].children.push(index);
        index
    }
}
