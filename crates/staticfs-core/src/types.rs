//! Core types for the node table.
//!
//! Paths are always Unix-style and absolute. A [`NodePath`] is validated once
//! at construction so the resolver can do plain exact-match lookups.
//!
//! # Examples
//!
//! ```
//! use staticfs_core::{Node, NodeKind, NodePath};
//!
//! let path = NodePath::new("/docs/readme.txt").unwrap();
//! assert_eq!(path.name(), "readme.txt");
//! assert_eq!(path.parent().unwrap().as_str(), "/docs");
//!
//! let node = Node::file(path, "hello", 0o644);
//! assert_eq!(node.kind(), NodeKind::RegularFile);
//! assert_eq!(node.size(), 5);
//! ```

use crate::error::{FsError, Result};
use std::fmt;

/// File type bits for a directory (`S_IFDIR`).
pub const S_IFDIR: u32 = 0o040_000;

/// File type bits for a regular file (`S_IFREG`).
pub const S_IFREG: u32 = 0o100_000;

/// Mask for the permission part of a mode (`0o7777`).
pub const PERMISSION_MASK: u32 = 0o7777;

/// Default permission bits reported for directories.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Default permission bits reported for regular files.
pub const DEFAULT_FILE_MODE: u32 = 0o777;

/// A validated absolute node path.
///
/// Accepted paths:
/// - start with `/`
/// - have no empty, `.` or `..` components
/// - have no trailing slash, except the root `/` itself
///
/// # Examples
///
/// ```
/// use staticfs_core::NodePath;
///
/// assert!(NodePath::new("/file").is_ok());
/// assert!(NodePath::new("/").unwrap().is_root());
///
/// assert!(NodePath::new("file").is_err());
/// assert!(NodePath::new("/a/../b").is_err());
/// assert!(NodePath::new("/dir/").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(String);

impl NodePath {
    /// Creates a new `NodePath`.
    ///
    /// # Errors
    ///
    /// Returns `FsError::InvalidPath` if the path is not absolute, has a
    /// trailing slash, or contains empty, `.` or `..` components.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();

        if path == "/" {
            return Ok(Self(path));
        }

        let Some(rest) = path.strip_prefix('/') else {
            return Err(FsError::InvalidPath { path });
        };

        let valid = rest
            .split('/')
            .all(|component| !component.is_empty() && component != "." && component != "..");

        if valid {
            Ok(Self(path))
        } else {
            Err(FsError::InvalidPath { path })
        }
    }

    /// Returns the root path `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns the parent directory, or `None` for the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::NodePath;
    ///
    /// let path = NodePath::new("/file").unwrap();
    /// assert!(path.parent().unwrap().is_root());
    /// assert!(NodePath::root().parent().is_none());
    /// ```
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        self.0.rfind('/').map(|pos| {
            if pos == 0 {
                Self::root()
            } else {
                Self(self.0[..pos].to_string())
            }
        })
    }

    /// Returns the final path component; empty for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rfind('/').map_or("", |pos| &self.0[pos + 1..])
    }

    /// Joins a single component onto this path.
    ///
    /// # Errors
    ///
    /// Returns `FsError::InvalidPath` if `name` is not a valid component,
    /// including an empty `name` or one that contains `/`.
    pub fn join(&self, name: &str) -> Result<Self> {
        if name.is_empty() || name.contains('/') {
            return Err(FsError::InvalidPath {
                path: format!("{}/{name}", self.0.trim_end_matches('/')),
            });
        }
        if self.is_root() {
            Self::new(format!("/{name}"))
        } else {
            Self::new(format!("{}/{name}", self.0))
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A directory
    Directory,
    /// A regular file with immutable content
    RegularFile,
}

impl NodeKind {
    /// Returns the `S_IFMT` type bits for this kind.
    #[must_use]
    pub const fn type_bits(self) -> u32 {
        match self {
            Self::Directory => S_IFDIR,
            Self::RegularFile => S_IFREG,
        }
    }
}

/// One filesystem entry.
///
/// Regular files own their content; directories carry none. Content never
/// changes after construction, so the reported size always equals the byte
/// length of the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    path: NodePath,
    kind: NodeKind,
    content: Box<[u8]>,
    mode_bits: u32,
}

impl Node {
    /// Creates a directory node.
    #[must_use]
    pub fn directory(path: NodePath, mode_bits: u32) -> Self {
        Self {
            path,
            kind: NodeKind::Directory,
            content: Box::default(),
            mode_bits: mode_bits & PERMISSION_MASK,
        }
    }

    /// Creates a regular file node.
    #[must_use]
    pub fn file(path: NodePath, content: impl Into<Vec<u8>>, mode_bits: u32) -> Self {
        Self {
            path,
            kind: NodeKind::RegularFile,
            content: content.into().into_boxed_slice(),
            mode_bits: mode_bits & PERMISSION_MASK,
        }
    }

    /// Returns the node path.
    #[must_use]
    pub const fn path(&self) -> &NodePath {
        &self.path
    }

    /// Returns the node kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Returns the file content; empty for directories.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the content length in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Returns the permission bits.
    #[must_use]
    pub const fn mode_bits(&self) -> u32 {
        self.mode_bits
    }

    /// Returns the attributes reported for this node.
    #[must_use]
    pub fn attributes(&self) -> FileAttributes {
        let (nlink, size) = match self.kind {
            NodeKind::Directory => (2, 0),
            NodeKind::RegularFile => (1, self.content.len() as u64),
        };

        FileAttributes {
            kind: self.kind,
            mode: self.kind.type_bits() | self.mode_bits,
            nlink,
            size,
        }
    }
}

/// Attributes returned by an attribute query.
///
/// `mode` includes both the type bits and the permission bits, exactly as a
/// `stat` structure would report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileAttributes {
    /// Node kind
    pub kind: NodeKind,
    /// `S_IFDIR | bits` or `S_IFREG | bits`
    pub mode: u32,
    /// Link count: 2 for directories, 1 for files
    pub nlink: u32,
    /// Content length in bytes; 0 for directories
    pub size: u64,
}

impl FileAttributes {
    /// Returns only the permission bits of `mode`.
    #[must_use]
    pub const fn permissions(&self) -> u32 {
        self.mode & PERMISSION_MASK
    }
}

/// One entry produced by directory enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name (`.`, `..`, or a child name)
    pub name: String,
    /// Entry kind
    pub kind: NodeKind,
}

impl DirEntry {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Token returned by a successful open.
///
/// Content is immutable and fully in memory, so the handle is only a borrow of
/// the resolved node. No descriptor table or open count exists behind it.
#[derive(Debug, Clone, Copy)]
pub struct Handle<'a> {
    node: &'a Node,
}

impl<'a> Handle<'a> {
    pub(crate) const fn new(node: &'a Node) -> Self {
        Self { node }
    }

    /// Returns the opened node.
    #[must_use]
    pub const fn node(&self) -> &'a Node {
        self.node
    }
}
