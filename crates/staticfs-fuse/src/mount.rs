//! Mounting a [`StaticFs`] through `fuser`.

use crate::bridge::StaticFs;
use crate::config::MountConfig;
use crate::error::{Error, Result};
use fuser::MountOption;
use std::path::Path;

/// Translates the mount configuration into `fuser` options.
///
/// The mount is always read-only and lets the kernel enforce the reported
/// permission bits.
#[must_use]
pub fn mount_options(config: &MountConfig) -> Vec<MountOption> {
    let mut options = vec![
        MountOption::RO,
        MountOption::FSName(config.fsname.clone()),
        MountOption::Subtype("staticfs".to_string()),
        MountOption::DefaultPermissions,
        MountOption::NoDev,
        MountOption::NoSuid,
    ];

    if config.allow_other {
        options.push(MountOption::AllowOther);
    }
    if config.auto_unmount {
        options.push(MountOption::AutoUnmount);
    }

    options
}

/// Mounts `fs` at `mountpoint` and serves requests until it is unmounted.
///
/// # Errors
///
/// Returns `Error::Mount` if the mount fails or the session ends with an
/// I/O error.
pub fn mount(fs: StaticFs, mountpoint: impl AsRef<Path>, config: &MountConfig) -> Result<()> {
    let mountpoint = mountpoint.as_ref();
    let options = mount_options(config);

    tracing::info!(
        mountpoint = %mountpoint.display(),
        fsname = %config.fsname,
        inodes = fs.inodes().len(),
        "mounting"
    );

    fuser::mount2(fs, mountpoint, &options).map_err(|source| Error::Mount {
        mountpoint: mountpoint.to_path_buf(),
        source,
    })
}
