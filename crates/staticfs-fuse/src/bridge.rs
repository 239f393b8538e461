//! `fuser::Filesystem` implementation over the node table.
//!
//! Every callback is split in two: a pure helper on [`StaticFs`] that returns
//! `Result<_, c_int>`, and the trait method that logs and hands the result to
//! the kernel reply. The helpers are what the tests drive.

use crate::config::MountConfig;
use crate::inode::{InodeMap, ROOT_INO, node_of};
use fuser::{
    FileAttr, FileType, Filesystem, KernelConfig, ReplyAttr, ReplyData, ReplyDirectory,
    ReplyEmpty, ReplyEntry, ReplyOpen, ReplyStatfs, Request,
};
use libc::c_int;
use staticfs_core::{FileAttributes, FilesystemOps, FsError, NodeKind, NodeTable};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Block size reported in attributes and `statfs`.
pub const BLOCK_SIZE: u32 = 4096;

/// Longest file name reported by `statfs`.
const MAX_NAME_LEN: u32 = 255;

/// Maps a core error to the errno the kernel expects.
#[must_use]
pub const fn errno(error: &FsError) -> c_int {
    match error {
        FsError::NotFound { .. } => libc::ENOENT,
        FsError::InvalidPath { .. } => libc::EINVAL,
        FsError::DuplicatePath { .. } => libc::EEXIST,
        FsError::NotADirectory { .. } => libc::ENOTDIR,
    }
}

const fn file_type(kind: NodeKind) -> FileType {
    match kind {
        NodeKind::Directory => FileType::Directory,
        NodeKind::RegularFile => FileType::RegularFile,
    }
}

/// One row of a directory listing as sent to the kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct DirRow {
    /// Inode of the entry
    pub ino: u64,
    /// Entry type
    pub kind: FileType,
    /// Entry name
    pub name: String,
}

/// The mounted filesystem.
#[derive(Debug)]
pub struct StaticFs {
    table: Arc<NodeTable>,
    inodes: InodeMap,
    ttl: Duration,
    uid: u32,
    gid: u32,
    mounted_at: SystemTime,
}

impl StaticFs {
    /// Creates a filesystem serving `table`, owned by the current user.
    #[must_use]
    pub fn new(table: Arc<NodeTable>, mount: &MountConfig) -> Self {
        let (uid, gid) = current_ids();
        Self::with_owner(table, mount, uid, gid)
    }

    /// Creates a filesystem serving `table` with an explicit owner.
    #[must_use]
    pub fn with_owner(table: Arc<NodeTable>, mount: &MountConfig, uid: u32, gid: u32) -> Self {
        let inodes = InodeMap::new(&table);
        Self {
            table,
            inodes,
            ttl: mount.attr_ttl(),
            uid,
            gid,
            mounted_at: SystemTime::now(),
        }
    }

    /// Returns the inode map.
    #[must_use]
    pub const fn inodes(&self) -> &InodeMap {
        &self.inodes
    }

    fn path_of(&self, ino: u64) -> Result<&str, c_int> {
        self.inodes.path(ino).ok_or(libc::ENOENT)
    }

    fn file_attr(&self, ino: u64, attrs: FileAttributes) -> FileAttr {
        FileAttr {
            ino,
            size: attrs.size,
            blocks: attrs.size.div_ceil(512),
            atime: self.mounted_at,
            mtime: self.mounted_at,
            ctime: self.mounted_at,
            crtime: self.mounted_at,
            kind: file_type(attrs.kind),
            perm: u16::try_from(attrs.permissions()).unwrap_or_default(),
            nlink: attrs.nlink,
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            blksize: BLOCK_SIZE,
            flags: 0,
        }
    }

    /// Attributes of `ino`.
    ///
    /// # Errors
    ///
    /// `ENOENT` for an unknown inode.
    pub fn attr(&self, ino: u64) -> Result<FileAttr, c_int> {
        let path = self.path_of(ino)?;
        let attrs = self.table.attributes(path).map_err(|e| errno(&e))?;
        Ok(self.file_attr(ino, attrs))
    }

    /// Attributes of the child `name` of directory `parent`.
    ///
    /// # Errors
    ///
    /// `ENOENT` if there is no such child or `name` is not UTF-8.
    pub fn lookup_child(&self, parent: u64, name: &OsStr) -> Result<FileAttr, c_int> {
        let name = name.to_str().ok_or(libc::ENOENT)?;
        let ino = self.inodes.lookup(parent, name).ok_or(libc::ENOENT)?;
        self.attr(ino)
    }

    /// Checks that `ino` can be opened with `flags`.
    ///
    /// # Errors
    ///
    /// `ENOENT` unless `ino` is a regular file, `EROFS` for any write access.
    pub fn check_open(&self, ino: u64, flags: i32) -> Result<(), c_int> {
        let path = self.path_of(ino)?;
        self.table.open(path).map_err(|e| errno(&e))?;

        let write_flags = libc::O_WRONLY | libc::O_RDWR | libc::O_APPEND | libc::O_TRUNC;
        if flags & write_flags != 0 {
            return Err(libc::EROFS);
        }
        Ok(())
    }

    /// Reads up to `size` bytes of `ino` starting at `offset`.
    ///
    /// # Errors
    ///
    /// `ENOENT` unless `ino` is a regular file, `EINVAL` for a negative offset.
    pub fn read_bytes(&self, ino: u64, offset: i64, size: u32) -> Result<&[u8], c_int> {
        let path = self.path_of(ino)?;
        let offset = usize::try_from(offset).map_err(|_| libc::EINVAL)?;
        let size = usize::try_from(size).map_err(|_| libc::EINVAL)?;
        self.table.read(path, size, offset).map_err(|e| errno(&e))
    }

    /// Checks that `ino` is a directory.
    ///
    /// # Errors
    ///
    /// `ENOENT` for an unknown inode, `ENOTDIR` for a regular file.
    pub fn check_opendir(&self, ino: u64) -> Result<(), c_int> {
        let node = node_of(&self.table, &self.inodes, ino).ok_or(libc::ENOENT)?;
        if node.is_dir() {
            Ok(())
        } else {
            Err(libc::ENOTDIR)
        }
    }

    /// Full listing of directory `ino`, dot entries first.
    ///
    /// # Errors
    ///
    /// `ENOENT` unless `ino` is a directory.
    pub fn dir_rows(&self, ino: u64) -> Result<Vec<DirRow>, c_int> {
        let path = self.path_of(ino)?;
        let entries = self.table.list(path).map_err(|e| errno(&e))?;
        let parent = self.inodes.parent(ino).unwrap_or(ROOT_INO);

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                let entry_ino = match entry.name.as_str() {
                    "." => ino,
                    ".." => parent,
                    name => self.inodes.lookup(ino, name)?,
                };
                Some(DirRow {
                    ino: entry_ino,
                    kind: file_type(entry.kind),
                    name: entry.name,
                })
            })
            .collect())
    }

    /// Rows of directory `ino` still to deliver after cookie `offset`, each
    /// paired with its own cookie.
    ///
    /// A row's cookie is its 1-based position, so resuming at `offset` yields
    /// the rows after the first `offset` ones.
    ///
    /// # Errors
    ///
    /// `ENOENT` unless `ino` is a directory, `EINVAL` for a negative offset.
    pub fn dir_rows_from(&self, ino: u64, offset: i64) -> Result<Vec<(i64, DirRow)>, c_int> {
        let skip = usize::try_from(offset).map_err(|_| libc::EINVAL)?;
        let rows = self.dir_rows(ino)?;
        Ok((1_i64..).zip(rows).skip(skip).collect())
    }

    /// Checks an `access(2)` request.
    ///
    /// # Errors
    ///
    /// `ENOENT` for an unknown inode, `EROFS` when write access is asked for.
    pub fn check_access(&self, ino: u64, mask: i32) -> Result<(), c_int> {
        self.path_of(ino)?;
        if mask & libc::W_OK != 0 {
            return Err(libc::EROFS);
        }
        Ok(())
    }
}

impl Filesystem for StaticFs {
    fn init(&mut self, _req: &Request<'_>, _config: &mut KernelConfig) -> Result<(), c_int> {
        tracing::info!(
            nodes = self.table.node_count(),
            files = self.table.file_count(),
            bytes = self.table.total_size(),
            "filesystem initialized"
        );
        Ok(())
    }

    fn destroy(&mut self) {
        tracing::info!("filesystem unmounted");
    }

    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        tracing::debug!(parent, ?name, "lookup");
        match self.lookup_child(parent, name) {
            Ok(attr) => reply.entry(&self.ttl, &attr, 0),
            Err(err) => reply.error(err),
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        tracing::debug!(ino, "getattr");
        match self.attr(ino) {
            Ok(attr) => reply.attr(&self.ttl, &attr),
            Err(err) => reply.error(err),
        }
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        tracing::debug!(ino, flags, "open");
        match self.check_open(ino, flags) {
            Ok(()) => reply.opened(0, 0),
            Err(err) => {
                tracing::warn!(ino, flags, errno = err, "open rejected");
                reply.error(err);
            }
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        tracing::debug!(ino, offset, size, "read");
        match self.read_bytes(ino, offset, size) {
            Ok(bytes) => reply.data(bytes),
            Err(err) => reply.error(err),
        }
    }

    fn release(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        _fh: u64,
        _flags: i32,
        _lock_owner: Option<u64>,
        _flush: bool,
        reply: ReplyEmpty,
    ) {
        reply.ok();
    }

    fn opendir(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        tracing::debug!(ino, "opendir");
        match self.check_opendir(ino) {
            Ok(()) => reply.opened(0, 0),
            Err(err) => reply.error(err),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        tracing::debug!(ino, offset, "readdir");
        let rows = match self.dir_rows_from(ino, offset) {
            Ok(rows) => rows,
            Err(err) => {
                reply.error(err);
                return;
            }
        };

        for (cookie, row) in rows {
            // Buffer full; the kernel asks again from the last cookie it kept.
            if reply.add(row.ino, cookie, row.kind, &row.name) {
                break;
            }
        }
        reply.ok();
    }

    fn releasedir(
        &mut self,
        _req: &Request<'_>,
        _ino: u64,
        _fh: u64,
        _flags: i32,
        reply: ReplyEmpty,
    ) {
        reply.ok();
    }

    fn statfs(&mut self, _req: &Request<'_>, _ino: u64, reply: ReplyStatfs) {
        let blocks = self.table.total_size().div_ceil(u64::from(BLOCK_SIZE));
        let files = u64::try_from(self.table.node_count()).unwrap_or(u64::MAX);
        reply.statfs(blocks, 0, 0, files, 0, BLOCK_SIZE, MAX_NAME_LEN, BLOCK_SIZE);
    }

    fn access(&mut self, _req: &Request<'_>, ino: u64, mask: i32, reply: ReplyEmpty) {
        match self.check_access(ino, mask) {
            Ok(()) => reply.ok(),
            Err(err) => reply.error(err),
        }
    }
}

/// Real uid and gid of this process.
#[allow(unsafe_code)]
fn current_ids() -> (u32, u32) {
    // SAFETY: getuid and getgid cannot fail and touch no memory.
    unsafe { (libc::getuid(), libc::getgid()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staticfs_core::NodeTableBuilder;

    const GREETING: &str = "Greetings from staticfs, a read-only in-memory FS!\n";

    fn fs() -> StaticFs {
        let table = NodeTableBuilder::new()
            .add_file("/file", GREETING)
            .add_file("/sub/nested", "nested\n")
            .build()
            .unwrap();
        StaticFs::with_owner(Arc::new(table), &MountConfig::default(), 1000, 100)
    }

    #[test]
    fn test_errno_mapping() {
        let path = "/x".to_string();
        assert_eq!(errno(&FsError::NotFound { path: path.clone() }), libc::ENOENT);
        assert_eq!(errno(&FsError::InvalidPath { path: path.clone() }), libc::EINVAL);
        assert_eq!(errno(&FsError::DuplicatePath { path: path.clone() }), libc::EEXIST);
        assert_eq!(errno(&FsError::NotADirectory { path }), libc::ENOTDIR);
    }

    #[test]
    fn test_root_attr() {
        let attr = fs().attr(ROOT_INO).unwrap();
        assert_eq!(attr.ino, ROOT_INO);
        assert_eq!(attr.kind, FileType::Directory);
        assert_eq!(attr.perm, 0o755);
        assert_eq!(attr.nlink, 2);
        assert_eq!(attr.uid, 1000);
        assert_eq!(attr.gid, 100);
    }

    #[test]
    fn test_file_attr() {
        let fs = fs();
        let ino = fs.inodes().ino_of("/file").unwrap();
        let attr = fs.attr(ino).unwrap();
        assert_eq!(attr.kind, FileType::RegularFile);
        assert_eq!(attr.perm, 0o777);
        assert_eq!(attr.nlink, 1);
        assert_eq!(attr.size, 51);
        assert_eq!(attr.blocks, 1);
        assert_eq!(attr.blksize, BLOCK_SIZE);
    }

    #[test]
    fn test_attr_unknown_inode() {
        assert_eq!(fs().attr(42).unwrap_err(), libc::ENOENT);
        assert_eq!(fs().attr(0).unwrap_err(), libc::ENOENT);
    }

    #[test]
    fn test_read_negative_offset() {
        let fs = fs();
        let ino = fs.inodes().ino_of("/file").unwrap();
        assert_eq!(fs.read_bytes(ino, -1, 10).unwrap_err(), libc::EINVAL);
    }

    #[test]
    fn test_open_write_flags() {
        let fs = fs();
        let ino = fs.inodes().ino_of("/file").unwrap();
        assert!(fs.check_open(ino, libc::O_RDONLY).is_ok());
        assert_eq!(fs.check_open(ino, libc::O_WRONLY).unwrap_err(), libc::EROFS);
        assert_eq!(fs.check_open(ino, libc::O_RDWR).unwrap_err(), libc::EROFS);
        assert_eq!(
            fs.check_open(ino, libc::O_RDONLY | libc::O_TRUNC).unwrap_err(),
            libc::EROFS
        );
    }

    #[test]
    fn test_open_directory() {
        assert_eq!(fs().check_open(ROOT_INO, libc::O_RDONLY).unwrap_err(), libc::ENOENT);
    }

    #[test]
    fn test_opendir() {
        let fs = fs();
        let file = fs.inodes().ino_of("/file").unwrap();
        assert!(fs.check_opendir(ROOT_INO).is_ok());
        assert_eq!(fs.check_opendir(file).unwrap_err(), libc::ENOTDIR);
        assert_eq!(fs.check_opendir(77).unwrap_err(), libc::ENOENT);
    }

    #[test]
    fn test_dir_rows_from_cookies() {
        let fs = fs();
        let names = |offset| -> Vec<(i64, String)> {
            fs.dir_rows_from(ROOT_INO, offset)
                .unwrap()
                .into_iter()
                .map(|(cookie, row)| (cookie, row.name))
                .collect()
        };

        assert_eq!(
            names(0),
            [
                (1, ".".to_string()),
                (2, "..".to_string()),
                (3, "file".to_string()),
                (4, "sub".to_string()),
            ]
        );
        assert_eq!(names(2), [(3, "file".to_string()), (4, "sub".to_string())]);
        assert_eq!(names(3), [(4, "sub".to_string())]);
        assert!(names(4).is_empty());
        assert!(names(100).is_empty());
    }

    #[test]
    fn test_dir_rows_from_errors() {
        let fs = fs();
        let file = fs.inodes().ino_of("/file").unwrap();
        assert_eq!(fs.dir_rows_from(ROOT_INO, -1).unwrap_err(), libc::EINVAL);
        assert_eq!(fs.dir_rows_from(file, 0).unwrap_err(), libc::ENOENT);
        assert_eq!(fs.dir_rows_from(99, 0).unwrap_err(), libc::ENOENT);
    }

    #[test]
    fn test_access() {
        let fs = fs();
        assert!(fs.check_access(ROOT_INO, libc::R_OK | libc::X_OK).is_ok());
        assert_eq!(fs.check_access(ROOT_INO, libc::W_OK).unwrap_err(), libc::EROFS);
        assert_eq!(fs.check_access(99, libc::F_OK).unwrap_err(), libc::ENOENT);
    }
}
