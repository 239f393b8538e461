//! Callback helpers of `StaticFs` driven by inode number, as the kernel would.

use fuser::FileType;
use staticfs_core::NodeTableBuilder;
use staticfs_fuse::{DirRow, MountConfig, ROOT_INO, StaticFs};
use std::ffi::OsStr;
use std::sync::Arc;

const GREETING: &str = "Greetings from staticfs, a read-only in-memory FS!\n";

fn mounted() -> StaticFs {
    let table = NodeTableBuilder::new()
        .add_file("/file", GREETING)
        .add_file("/empty", "")
        .add_file("/docs/guide.md", "# Guide\n")
        .build()
        .unwrap();
    StaticFs::with_owner(Arc::new(table), &MountConfig::default(), 0, 0)
}

#[test]
fn test_lookup_then_read() {
    let fs = mounted();

    let attr = fs.lookup_child(ROOT_INO, OsStr::new("file")).unwrap();
    assert_eq!(attr.kind, FileType::RegularFile);
    assert_eq!(attr.size, 51);

    assert!(fs.check_open(attr.ino, libc::O_RDONLY).is_ok());
    assert_eq!(fs.read_bytes(attr.ino, 0, 4096).unwrap(), GREETING.as_bytes());
    assert_eq!(fs.read_bytes(attr.ino, 10, 5).unwrap(), &GREETING.as_bytes()[10..15]);
    assert_eq!(fs.read_bytes(attr.ino, 46, 100).unwrap(), b" FS!\n");
    assert!(fs.read_bytes(attr.ino, 51, 10).unwrap().is_empty());
    assert!(fs.read_bytes(attr.ino, 1_000, 10).unwrap().is_empty());
}

#[test]
fn test_lookup_missing() {
    let fs = mounted();
    assert_eq!(
        fs.lookup_child(ROOT_INO, OsStr::new("nope")).unwrap_err(),
        libc::ENOENT
    );
    assert_eq!(
        fs.lookup_child(ROOT_INO, OsStr::new("guide.md")).unwrap_err(),
        libc::ENOENT
    );
}

#[test]
fn test_root_listing() {
    let fs = mounted();
    let docs = fs.inodes().ino_of("/docs").unwrap();

    let rows = fs.dir_rows(ROOT_INO).unwrap();
    assert_eq!(
        rows,
        vec![
            DirRow {
                ino: ROOT_INO,
                kind: FileType::Directory,
                name: ".".to_string()
            },
            DirRow {
                ino: ROOT_INO,
                kind: FileType::Directory,
                name: "..".to_string()
            },
            DirRow {
                ino: 2,
                kind: FileType::RegularFile,
                name: "file".to_string()
            },
            DirRow {
                ino: 3,
                kind: FileType::RegularFile,
                name: "empty".to_string()
            },
            DirRow {
                ino: docs,
                kind: FileType::Directory,
                name: "docs".to_string()
            },
        ]
    );
}

#[test]
fn test_nested_listing_points_back_to_parent() {
    let fs = mounted();
    let docs = fs.lookup_child(ROOT_INO, OsStr::new("docs")).unwrap();
    assert_eq!(docs.kind, FileType::Directory);
    assert_eq!(docs.nlink, 2);

    let rows = fs.dir_rows(docs.ino).unwrap();
    let summary: Vec<_> = rows.iter().map(|r| (r.name.as_str(), r.ino)).collect();
    let guide = fs.inodes().ino_of("/docs/guide.md").unwrap();
    assert_eq!(summary, [(".", docs.ino), ("..", ROOT_INO), ("guide.md", guide)]);

    let attr = fs.lookup_child(docs.ino, OsStr::new("guide.md")).unwrap();
    assert_eq!(fs.read_bytes(attr.ino, 0, 64).unwrap(), b"# Guide\n");
}

#[test]
fn test_readdir_resumes_after_last_cookie() {
    let fs = mounted();
    let full = fs.dir_rows(ROOT_INO).unwrap();

    // Take two rows per batch, resuming from the last cookie delivered.
    let mut delivered = Vec::new();
    let mut offset = 0;
    loop {
        let batch: Vec<_> = fs
            .dir_rows_from(ROOT_INO, offset)
            .unwrap()
            .into_iter()
            .take(2)
            .collect();
        let Some(&(last, _)) = batch.last() else {
            break;
        };
        offset = last;
        delivered.extend(batch.into_iter().map(|(_, row)| row));
    }

    assert_eq!(delivered, full);
}

#[test]
fn test_listing_a_file_fails() {
    let fs = mounted();
    let file = fs.inodes().ino_of("/file").unwrap();
    assert_eq!(fs.dir_rows(file).unwrap_err(), libc::ENOENT);
    assert_eq!(fs.check_opendir(file).unwrap_err(), libc::ENOTDIR);
}

#[test]
fn test_empty_file() {
    let fs = mounted();
    let attr = fs.lookup_child(ROOT_INO, OsStr::new("empty")).unwrap();
    assert_eq!(attr.size, 0);
    assert_eq!(attr.blocks, 0);
    assert!(fs.read_bytes(attr.ino, 0, 10).unwrap().is_empty());
}

#[test]
fn test_read_directory_fails() {
    let fs = mounted();
    assert_eq!(fs.read_bytes(ROOT_INO, 0, 10).unwrap_err(), libc::ENOENT);
}

#[test]
fn test_owner_is_reported_without_touching_content() {
    let table = NodeTableBuilder::new().add_file("/a", "a").build().unwrap();
    let fs = StaticFs::with_owner(Arc::new(table), &MountConfig::default(), 42, 7);

    let attr = fs.attr(2).unwrap();
    assert_eq!((attr.uid, attr.gid), (42, 7));
    assert_eq!(fs.read_bytes(2, 0, 1).unwrap(), b"a");
}
