//! The operation set consumed by a filesystem bridge.
//!
//! A bridge (FUSE or otherwise) only ever talks to the core through
//! [`FilesystemOps`]. Every operation is read-only and side-effect free, so
//! implementations can be shared between threads without locking.

use crate::error::Result;
use crate::types::{DirEntry, FileAttributes, Handle, Node};

/// Read-only filesystem operations keyed by absolute path.
///
/// # Examples
///
/// ```
/// use staticfs_core::{FilesystemOps, NodeTable};
///
/// let table = NodeTable::single_file("file", "hello world").unwrap();
///
/// let attrs = table.attributes("/file").unwrap();
/// assert_eq!(attrs.size, 11);
///
/// let bytes = table.read("/file", 5, 6).unwrap();
/// assert_eq!(bytes, b"world");
/// ```
pub trait FilesystemOps: Send + Sync {
    /// Resolves `path` to a node by exact match.
    fn resolve(&self, path: &str) -> Option<&Node>;

    /// Returns the attributes of the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` if `path` does not resolve.
    fn attributes(&self, path: &str) -> Result<FileAttributes>;

    /// Lists a directory: `.`, `..`, then each direct child once.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` if `path` is not a directory.
    fn list(&self, path: &str) -> Result<Vec<DirEntry>>;

    /// Opens a regular file.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` if `path` is not a regular file.
    fn open(&self, path: &str) -> Result<Handle<'_>>;

    /// Reads up to `size` bytes starting at `offset`.
    ///
    /// Returns an empty slice at or past end of file, and a short slice when
    /// the range runs past the end.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` if `path` is not a regular file.
    fn read(&self, path: &str, size: usize, offset: usize) -> Result<&[u8]>;
}

/// Returns the bounded window `content[offset..offset + size]`.
///
/// - `offset >= content.len()` yields an empty slice (end of file)
/// - a window running past the end is cut short at the end
///
/// # Examples
///
/// ```
/// use staticfs_core::read_range;
///
/// let content = b"0123456789";
/// assert_eq!(read_range(content, 4, 2), b"2345");
/// assert_eq!(read_range(content, 100, 7), b"789");
/// assert!(read_range(content, 1, 10).is_empty());
/// ```
#[must_use]
pub fn read_range(content: &[u8], size: usize, offset: usize) -> &[u8] {
    let len = content.len();
    if offset >= len {
        return &[];
    }
    let end = offset.saturating_add(size).min(len);
    &content[offset..end]
}
