//! Error types for the node table and its operations.
//!
//! Filesystem operations fail with exactly one kind, [`FsError::NotFound`].
//! The remaining variants can only surface while a [`NodeTable`] is being
//! built, never once the table is serving requests.
//!
//! # Examples
//!
//! ```
//! use staticfs_core::FsError;
//!
//! let error = FsError::NotFound {
//!     path: "/missing".to_string(),
//! };
//!
//! assert!(error.is_not_found());
//! ```
//!
//! [`NodeTable`]: crate::NodeTable

use thiserror::Error;

/// Errors produced by the core.
///
/// All variants carry the offending path (or a description) and expose
/// `is_xxx()` helpers for classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    /// Path does not resolve to a node of the kind the operation needs.
    ///
    /// Covers both missing paths and kind mismatches such as reading a
    /// directory or listing a regular file.
    #[error("No such file or directory: {path}")]
    NotFound {
        /// The path that failed to resolve
        path: String,
    },

    /// Path is empty, relative, or contains empty, `.` or `..` components.
    #[error("Invalid path: {path}")]
    InvalidPath {
        /// The rejected path
        path: String,
    },

    /// A node was declared twice.
    #[error("Duplicate path: {path}")]
    DuplicatePath {
        /// The path declared more than once
        path: String,
    },

    /// A node was declared beneath a regular file.
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The regular file used as a parent
        path: String,
    },
}

impl FsError {
    /// Returns `true` if this is a not-found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::FsError;
    ///
    /// let error = FsError::NotFound {
    ///     path: "/nope".to_string(),
    /// };
    /// assert!(error.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is an invalid path error.
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns `true` if the table layout was inconsistent.
    #[must_use]
    pub const fn is_layout_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicatePath { .. } | Self::NotADirectory { .. }
        )
    }

    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

/// Type alias for core results.
pub type Result<T> = std::result::Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        let error = FsError::not_found("/missing");
        assert!(error.is_not_found());
        assert!(!error.is_invalid_path());
        assert!(!error.is_layout_error());
    }

    #[test]
    fn test_is_layout_error() {
        let duplicate = FsError::DuplicatePath {
            path: "/file".to_string(),
        };
        let not_dir = FsError::NotADirectory {
            path: "/file".to_string(),
        };
        assert!(duplicate.is_layout_error());
        assert!(not_dir.is_layout_error());
        assert!(!duplicate.is_not_found());
    }

    #[test]
    fn test_display_includes_path() {
        let error = FsError::not_found("/missing");
        assert_eq!(error.to_string(), "No such file or directory: /missing");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FsError>();
    }
}
