//! Read-only in-memory filesystem core.
//!
//! Holds a fixed table of nodes (one root directory plus any number of files
//! and subdirectories) and answers the four operations a filesystem bridge
//! needs: attribute query, directory listing, open and byte-range read.
//!
//! # Features
//!
//! - **Table-driven**: exact-match path lookup in a table built once
//! - **Immutable**: no node is added, removed or changed after `build()`
//! - **Lock-free sharing**: all types are `Send + Sync`, every operation is pure
//! - **Bridge-agnostic**: bridges consume the [`FilesystemOps`] trait
//!
//! # Examples
//!
//! ```
//! use staticfs_core::{FilesystemOps, NodeKind, NodeTableBuilder};
//!
//! let table = NodeTableBuilder::new()
//!     .add_file("/file", "I'm the content of the only file available there\n")
//!     .build()
//!     .unwrap();
//!
//! let attrs = table.attributes("/file").unwrap();
//! assert_eq!(attrs.kind, NodeKind::RegularFile);
//! assert_eq!(attrs.size, 49);
//!
//! // Reads past the end are short, reads at the end are empty
//! assert_eq!(table.read("/file", 100, 45).unwrap(), b"ere\n");
//! assert!(table.read("/file", 10, 49).unwrap().is_empty());
//!
//! assert!(table.attributes("/missing").unwrap_err().is_not_found());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod error;
pub mod ops;
pub mod table;
pub mod types;

pub use builder::NodeTableBuilder;
pub use error::{FsError, Result};
pub use ops::{FilesystemOps, read_range};
pub use table::NodeTable;
pub use types::{
    DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, DirEntry, FileAttributes, Handle, Node, NodeKind,
    NodePath, PERMISSION_MASK, S_IFDIR, S_IFREG,
};
