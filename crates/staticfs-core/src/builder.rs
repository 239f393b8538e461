//! Builder pattern for constructing node tables.
//!
//! The table is fixed once built, so this builder is the only way to put
//! nodes into it. Errors are collected while chaining and the first one is
//! reported by [`NodeTableBuilder::build`].
//!
//! # Examples
//!
//! ```
//! use staticfs_core::{FilesystemOps, NodeTableBuilder};
//!
//! let table = NodeTableBuilder::new()
//!     .file_mode(0o444)
//!     .add_file("/README", "read me\n")
//!     .add_file("/docs/guide.txt", "nested files create their parents\n")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.file_count(), 2);
//! assert!(table.resolve("/docs").unwrap().is_dir());
//! ```

use crate::error::{FsError, Result};
use crate::ops::FilesystemOps;
use crate::table::NodeTable;
use crate::types::{DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, Node, NodePath};

#[derive(Debug)]
enum Pending {
    File {
        path: String,
        content: Vec<u8>,
        mode: Option<u32>,
    },
    Dir {
        path: String,
    },
}

/// Builder for a [`NodeTable`].
///
/// Modes set with [`file_mode`](Self::file_mode) and
/// [`dir_mode`](Self::dir_mode) apply to every node without an explicit mode,
/// regardless of the order in which they are called.
#[derive(Debug)]
pub struct NodeTableBuilder {
    file_mode: u32,
    dir_mode: u32,
    pending: Vec<Pending>,
}

impl NodeTableBuilder {
    /// Creates a builder with the default modes (`0777` files, `0755` dirs).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            pending: Vec::new(),
        }
    }

    /// Sets the permission bits for files added without an explicit mode.
    #[must_use]
    pub const fn file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    /// Sets the permission bits for the root and every other directory.
    #[must_use]
    pub const fn dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    /// Adds a regular file. Missing parent directories are created.
    #[must_use]
    pub fn add_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.pending.push(Pending::File {
            path: path.into(),
            content: content.into(),
            mode: None,
        });
        self
    }

    /// Adds a regular file with its own permission bits.
    #[must_use]
    pub fn add_file_with_mode(
        mut self,
        path: impl Into<String>,
        content: impl Into<Vec<u8>>,
        mode: u32,
    ) -> Self {
        self.pending.push(Pending::File {
            path: path.into(),
            content: content.into(),
            mode: Some(mode),
        });
        self
    }

    /// Adds multiple files at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::NodeTableBuilder;
    ///
    /// let table = NodeTableBuilder::new()
    ///     .add_files([("/a", "1"), ("/b", "2")])
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(table.file_count(), 2);
    /// ```
    #[must_use]
    pub fn add_files<P, C>(mut self, files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<String>,
        C: Into<Vec<u8>>,
    {
        for (path, content) in files {
            self = self.add_file(path, content);
        }
        self
    }

    /// Adds an empty directory. Missing parent directories are created.
    #[must_use]
    pub fn add_dir(mut self, path: impl Into<String>) -> Self {
        self.pending.push(Pending::Dir { path: path.into() });
        self
    }

    /// Returns the number of nodes explicitly added so far.
    #[must_use]
    pub const fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Consumes the builder and returns the table.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered:
    /// - `FsError::InvalidPath` for a malformed path
    /// - `FsError::DuplicatePath` for a path added twice (including `/`)
    /// - `FsError::NotADirectory` for a path below a regular file
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::NodeTableBuilder;
    ///
    /// let result = NodeTableBuilder::new()
    ///     .add_file("relative/path", "content")
    ///     .build();
    ///
    /// assert!(result.unwrap_err().is_invalid_path());
    /// ```
    pub fn build(self) -> Result<NodeTable> {
        let mut table = NodeTable::with_root_mode(self.dir_mode);

        for pending in self.pending {
            match pending {
                Pending::File {
                    path,
                    content,
                    mode,
                } => {
                    let path = NodePath::new(path)?;
                    ensure_parents(&mut table, &path, self.dir_mode)?;
                    table.insert(Node::file(path, content, mode.unwrap_or(self.file_mode)))?;
                }
                Pending::Dir { path } => {
                    let path = NodePath::new(path)?;
                    ensure_parents(&mut table, &path, self.dir_mode)?;
                    table.insert(Node::directory(path, self.dir_mode))?;
                }
            }
        }

        tracing::debug!(
            nodes = table.node_count(),
            files = table.file_count(),
            bytes = table.total_size(),
            "built node table"
        );
        Ok(table)
    }
}

impl Default for NodeTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates every missing ancestor of `path` as a directory.
fn ensure_parents(table: &mut NodeTable, path: &NodePath, dir_mode: u32) -> Result<()> {
    let mut missing = Vec::new();
    let mut current = path.parent();

    while let Some(dir) = current {
        match table.resolve(dir.as_str()) {
            Some(node) if node.is_dir() => break,
            Some(_) => {
                return Err(FsError::NotADirectory {
                    path: dir.to_string(),
                });
            }
            None => {
                current = dir.parent();
                missing.push(dir);
            }
        }
    }

    for dir in missing.into_iter().rev() {
        table.insert(Node::directory(dir, dir_mode))?;
    }
    Ok(())
}
