//! FUSE bridge for the staticfs node table.
//!
//! Turns a [`NodeTable`](staticfs_core::NodeTable) into a mountable
//! `fuser::Filesystem`:
//! - [`FsConfig`] - TOML description of the layout and mount options
//! - [`InodeMap`] - stable inode numbers for the path-keyed table
//! - [`StaticFs`] - the callbacks, each backed by a testable helper
//! - [`mount`] - blocking mount of a [`StaticFs`]
//!
//! # Examples
//!
//! ```
//! use staticfs_fuse::{FsConfig, ROOT_INO, StaticFs};
//! use std::sync::Arc;
//!
//! let config = FsConfig::default();
//! let table = Arc::new(config.to_table().unwrap());
//! let fs = StaticFs::new(table, &config.mount);
//!
//! let rows = fs.dir_rows(ROOT_INO).unwrap();
//! let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
//! assert_eq!(names, [".", "..", "file"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod inode;
pub mod mount;

pub use bridge::{BLOCK_SIZE, DirRow, StaticFs, errno};
pub use cli::{Cli, render_tree};
pub use config::{DEFAULT_FILE_CONTENT, DEFAULT_FILE_PATH, FileEntry, FsConfig, MountConfig};
pub use error::{Error, Result};
pub use inode::{InodeMap, ROOT_INO};
pub use mount::{mount, mount_options};
