//! Error types for the bridge, configuration and mount.

use staticfs_core::FsError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing or running a mount.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration or content source file could not be read.
    #[error("Failed to read {path}")]
    Io {
        /// The file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid TOML for [`FsConfig`](crate::FsConfig).
    #[error("Failed to parse configuration from {origin}")]
    Parse {
        /// Where the text came from
        origin: String,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Configuration parsed but is inconsistent.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// The node table could not be built.
    #[error(transparent)]
    Table(#[from] FsError),

    /// The kernel refused the mount or the session failed.
    #[error("Failed to mount at {mountpoint}")]
    Mount {
        /// Requested mount point
        mountpoint: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a configuration problem of any kind.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::ConfigError { .. } | Self::Table(_)
        )
    }
}

/// Type alias for bridge results.
pub type Result<T> = std::result::Result<T, Error>;
