//! The node table and its path resolver.
//!
//! `NodeTable` maps absolute paths to nodes with O(1) exact-match lookup.
//! It is populated once through [`NodeTableBuilder`] and is read-only
//! afterwards, which is what makes every operation safe to call from any
//! number of threads at once.
//!
//! # Examples
//!
//! ```
//! use staticfs_core::{FilesystemOps, NodeTableBuilder};
//!
//! let table = NodeTableBuilder::new()
//!     .add_file("/file", "I'm the content of the only file available there\n")
//!     .build()
//!     .unwrap();
//!
//! let names: Vec<_> = table.list("/").unwrap().into_iter().map(|e| e.name).collect();
//! assert_eq!(names, [".", "..", "file"]);
//! ```
//!
//! [`NodeTableBuilder`]: crate::NodeTableBuilder

use crate::error::{FsError, Result};
use crate::ops::{FilesystemOps, read_range};
use crate::types::{
    DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, DirEntry, FileAttributes, Handle, Node, NodeKind,
    NodePath,
};
use std::collections::HashMap;

/// An immutable table of nodes keyed by path.
///
/// Nodes are kept in declaration order; index 0 is always the root directory.
/// Directory listings follow that order.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`. Share it with `Arc` when several owners
/// need it.
#[derive(Debug, Clone)]
pub struct NodeTable {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
}

impl NodeTable {
    /// Creates a table holding only the root directory with default mode.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root_mode(DEFAULT_DIR_MODE)
    }

    pub(crate) fn with_root_mode(mode_bits: u32) -> Self {
        let root = Node::directory(NodePath::root(), mode_bits);
        let mut index = HashMap::new();
        index.insert(root.path().as_str().to_string(), 0);

        Self {
            nodes: vec![root],
            index,
            children: vec![Vec::new()],
        }
    }

    /// Creates the classic layout: the root plus one file directly below it.
    ///
    /// The file is reported with mode `0777`.
    ///
    /// # Errors
    ///
    /// Returns `FsError::InvalidPath` if `name` is not a single valid
    /// component.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::{FilesystemOps, NodeTable};
    ///
    /// let table = NodeTable::single_file("file", "content").unwrap();
    /// assert_eq!(table.node_count(), 2);
    /// assert_eq!(table.attributes("/file").unwrap().size, 7);
    ///
    /// assert!(NodeTable::single_file("a/b", "x").unwrap_err().is_invalid_path());
    /// ```
    pub fn single_file(name: &str, content: impl Into<Vec<u8>>) -> Result<Self> {
        let path = NodePath::root().join(name)?;
        let mut table = Self::new();
        table.insert(Node::file(path, content, DEFAULT_FILE_MODE))?;
        Ok(table)
    }

    /// Inserts a node under an existing directory.
    pub(crate) fn insert(&mut self, node: Node) -> Result<()> {
        let path = node.path().clone();
        if self.index.contains_key(path.as_str()) {
            return Err(FsError::DuplicatePath {
                path: path.to_string(),
            });
        }

        let parent = path.parent().ok_or_else(|| FsError::DuplicatePath {
            path: path.to_string(),
        })?;
        let parent_idx = *self
            .index
            .get(parent.as_str())
            .ok_or_else(|| FsError::not_found(parent.as_str()))?;
        if !self.nodes[parent_idx].is_dir() {
            return Err(FsError::NotADirectory {
                path: parent.to_string(),
            });
        }

        let idx = self.nodes.len();
        self.index.insert(path.as_str().to_string(), idx);
        self.nodes.push(node);
        self.children.push(Vec::new());
        self.children[parent_idx].push(idx);
        Ok(())
    }

    /// Returns the root directory node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Returns the total number of nodes, root included.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of regular files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_dir()).count()
    }

    /// Returns the sum of all file sizes in bytes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.nodes.iter().map(|n| n.size() as u64).sum()
    }

    /// Iterates over all nodes in declaration order, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterates over the direct children of the directory at `path`.
    ///
    /// Returns `None` if `path` is not a directory.
    pub fn children(&self, path: &str) -> Option<impl Iterator<Item = &Node>> {
        let idx = *self.index.get(path)?;
        if !self.nodes[idx].is_dir() {
            return None;
        }
        Some(self.children[idx].iter().map(|&child| &self.nodes[child]))
    }

    fn resolve_kind(&self, path: &str, kind: NodeKind) -> Result<&Node> {
        self.resolve(path)
            .filter(|node| node.kind() == kind)
            .ok_or_else(|| FsError::not_found(path))
    }
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FilesystemOps for NodeTable {
    fn resolve(&self, path: &str) -> Option<&Node> {
        self.index.get(path).map(|&idx| &self.nodes[idx])
    }

    fn attributes(&self, path: &str) -> Result<FileAttributes> {
        self.resolve(path)
            .map(Node::attributes)
            .ok_or_else(|| FsError::not_found(path))
    }

    fn list(&self, path: &str) -> Result<Vec<DirEntry>> {
        let children = self
            .children(path)
            .ok_or_else(|| FsError::not_found(path))?;

        let mut entries = vec![
            DirEntry::new(".", NodeKind::Directory),
            DirEntry::new("..", NodeKind::Directory),
        ];
        entries.extend(children.map(|child| DirEntry::new(child.path().name(), child.kind())));
        Ok(entries)
    }

    fn open(&self, path: &str) -> Result<Handle<'_>> {
        self.resolve_kind(path, NodeKind::RegularFile)
            .map(Handle::new)
    }

    fn read(&self, path: &str, size: usize, offset: usize) -> Result<&[u8]> {
        let node = self.resolve_kind(path, NodeKind::RegularFile)?;
        Ok(read_range(node.content(), size, offset))
    }
}
