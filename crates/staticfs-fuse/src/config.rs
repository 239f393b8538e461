//! Filesystem and mount configuration.
//!
//! The layout is described in TOML and turned into a [`NodeTable`] before the
//! mount starts. Without any `[[files]]` entries the classic layout is used:
//! a root directory holding a single `/file`.
//!
//! # Examples
//!
//! ```
//! use staticfs_fuse::FsConfig;
//! use staticfs_core::FilesystemOps;
//!
//! let config = FsConfig::from_toml_str(r#"
//!     file_mode = 0o444
//!
//!     [mount]
//!     fsname = "demo"
//!
//!     [[files]]
//!     path = "/hello.txt"
//!     content = "hello\n"
//! "#).unwrap();
//!
//! let table = config.to_table().unwrap();
//! assert_eq!(table.attributes("/hello.txt").unwrap().permissions(), 0o444);
//! assert_eq!(config.mount.fsname, "demo");
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use staticfs_core::{
    DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, NodeTable, NodeTableBuilder, PERMISSION_MASK,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the file in the classic layout.
pub const DEFAULT_FILE_PATH: &str = "/file";

/// Content of the file in the classic layout.
pub const DEFAULT_FILE_CONTENT: &str = "I'm the content of the only file available there\n";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FsConfig {
    /// Permission bits for files without an explicit `mode`.
    pub file_mode: u32,

    /// Permission bits for the root and every other directory.
    pub dir_mode: u32,

    /// Files to expose. Empty means the classic single-file layout.
    pub files: Vec<FileEntry>,

    /// Mount behaviour.
    pub mount: MountConfig,

    /// Directory relative `source` paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// One file of the layout.
///
/// Exactly one of `content` and `source` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileEntry {
    /// Absolute path inside the mount
    pub path: String,
    /// Inline UTF-8 content
    #[serde(default)]
    pub content: Option<String>,
    /// Host file whose bytes are loaded once at startup
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// Permission bits overriding `file_mode`
    #[serde(default)]
    pub mode: Option<u32>,
}

impl FileEntry {
    /// Creates an entry with inline content.
    #[must_use]
    pub fn inline(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: Some(content.into()),
            source: None,
            mode: None,
        }
    }
}

/// Options passed to the FUSE mount.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MountConfig {
    /// Filesystem name shown by `mount`
    pub fsname: String,
    /// Let other users access the mount (needs `user_allow_other`)
    pub allow_other: bool,
    /// Unmount automatically when the process exits
    pub auto_unmount: bool,
    /// How long the kernel may cache attributes and entries, in seconds
    pub attr_ttl_secs: u64,
}

impl MountConfig {
    /// Returns the attribute cache TTL.
    #[must_use]
    pub const fn attr_ttl(&self) -> Duration {
        Duration::from_secs(self.attr_ttl_secs)
    }
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            fsname: "staticfs".to_string(),
            allow_other: false,
            auto_unmount: false,
            attr_ttl_secs: 1,
        }
    }
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            files: Vec::new(),
            mount: MountConfig::default(),
            base_dir: None,
        }
    }
}

impl FsConfig {
    /// Returns the per-user configuration path, `<config dir>/staticfs/config.toml`.
    ///
    /// Returns `None` if the platform has no configuration directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("staticfs").join("config.toml"))
    }

    /// Parses configuration from TOML text.
    ///
    /// Relative `source` paths resolve against the current directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` if the text is not valid configuration.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, "<inline>")
    }

    /// Loads configuration from a TOML file.
    ///
    /// Relative `source` paths resolve against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Parse` if it
    /// is not valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::parse(&text, &path.display().to_string())?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        tracing::debug!(path = %path.display(), files = config.files.len(), "loaded configuration");
        Ok(config)
    }

    fn parse(text: &str, origin: &str) -> Result<Self> {
        toml::from_str(text).map_err(|source| Error::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Appends an inline file.
    pub fn push_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.push(FileEntry::inline(path, content));
    }

    /// Builds the node table described by this configuration.
    ///
    /// `source` files are read here, once; later changes on the host are not
    /// seen by the mount.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` for a mode above `0o7777` or an entry with
    /// both or neither of `content` and `source`, `Error::Io` for an
    /// unreadable source, and `Error::Table` for an invalid layout.
    pub fn to_table(&self) -> Result<NodeTable> {
        check_mode("file_mode", self.file_mode)?;
        check_mode("dir_mode", self.dir_mode)?;

        let mut builder = NodeTableBuilder::new()
            .file_mode(self.file_mode)
            .dir_mode(self.dir_mode);

        if self.files.is_empty() {
            builder = builder.add_file(DEFAULT_FILE_PATH, DEFAULT_FILE_CONTENT);
        }

        for entry in &self.files {
            let content = self.entry_content(entry)?;
            builder = match entry.mode {
                Some(mode) => {
                    check_mode(&entry.path, mode)?;
                    builder.add_file_with_mode(entry.path.as_str(), content, mode)
                }
                None => builder.add_file(entry.path.as_str(), content),
            };
        }

        Ok(builder.build()?)
    }

    fn entry_content(&self, entry: &FileEntry) -> Result<Vec<u8>> {
        match (&entry.content, &entry.source) {
            (Some(content), None) => Ok(content.clone().into_bytes()),
            (None, Some(source)) => {
                let path = match &self.base_dir {
                    Some(base) if source.is_relative() => base.join(source),
                    _ => source.clone(),
                };
                fs::read(&path).map_err(|source| Error::Io { path, source })
            }
            (Some(_), Some(_)) => Err(Error::ConfigError {
                message: format!("{}: set either content or source, not both", entry.path),
            }),
            (None, None) => Err(Error::ConfigError {
                message: format!("{}: missing content or source", entry.path),
            }),
        }
    }
}

fn check_mode(what: &str, mode: u32) -> Result<()> {
    if mode & !PERMISSION_MASK == 0 {
        Ok(())
    } else {
        Err(Error::ConfigError {
            message: format!("{what}: mode {mode:#o} exceeds 0o7777"),
        })
    }
}
