//! Inode numbering for the path-keyed node table.
//!
//! The FUSE protocol addresses nodes by inode number while the core resolves
//! paths. Numbers are handed out in the table's declaration order, so the root
//! is always [`ROOT_INO`] and the mapping is stable for the whole mount.

use staticfs_core::{FilesystemOps, NodeTable};
use std::collections::HashMap;

/// Inode number of the root directory (`FUSE_ROOT_ID`).
pub const ROOT_INO: u64 = fuser::FUSE_ROOT_ID;

/// Bidirectional map between inode numbers and node paths.
#[derive(Debug, Clone)]
pub struct InodeMap {
    paths: Vec<String>,
    parents: Vec<u64>,
    entries: HashMap<(u64, String), u64>,
}

impl InodeMap {
    /// Numbers every node of `table`.
    #[must_use]
    pub fn new(table: &NodeTable) -> Self {
        let mut by_path: HashMap<&str, u64> = HashMap::new();
        let mut paths = Vec::with_capacity(table.node_count());
        let mut parents = Vec::with_capacity(table.node_count());
        let mut entries = HashMap::new();

        for (ino, node) in (ROOT_INO..).zip(table.iter()) {
            let path = node.path();
            // Parents are always declared before their children.
            let parent = path
                .parent()
                .and_then(|p| by_path.get(p.as_str()).copied())
                .unwrap_or(ROOT_INO);

            if !path.is_root() {
                entries.insert((parent, path.name().to_string()), ino);
            }
            by_path.insert(path.as_str(), ino);
            paths.push(path.as_str().to_string());
            parents.push(parent);
        }

        Self {
            paths,
            parents,
            entries,
        }
    }

    fn slot(ino: u64) -> Option<usize> {
        ino.checked_sub(ROOT_INO)
            .and_then(|idx| usize::try_from(idx).ok())
    }

    /// Returns the path of `ino`.
    #[must_use]
    pub fn path(&self, ino: u64) -> Option<&str> {
        Self::slot(ino)
            .and_then(|idx| self.paths.get(idx))
            .map(String::as_str)
    }

    /// Returns the parent inode of `ino`; the root is its own parent.
    #[must_use]
    pub fn parent(&self, ino: u64) -> Option<u64> {
        Self::slot(ino).and_then(|idx| self.parents.get(idx).copied())
    }

    /// Finds the child called `name` inside directory `parent`.
    #[must_use]
    pub fn lookup(&self, parent: u64, name: &str) -> Option<u64> {
        self.entries.get(&(parent, name.to_string())).copied()
    }

    /// Returns the inode of `path`, if numbered.
    #[must_use]
    pub fn ino_of(&self, path: &str) -> Option<u64> {
        self.paths
            .iter()
            .position(|p| p == path)
            .and_then(|idx| u64::try_from(idx).ok())
            .map(|idx| idx + ROOT_INO)
    }

    /// Returns the number of inodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if no inode is numbered. Never the case for a built table.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Resolves `ino` straight to a node.
pub(crate) fn node_of<'a>(
    table: &'a NodeTable,
    inodes: &InodeMap,
    ino: u64,
) -> Option<&'a staticfs_core::Node> {
    inodes.path(ino).and_then(|path| table.resolve(path))
}
