//! Loading configuration files from disk.

use staticfs_core::FilesystemOps;
use staticfs_fuse::{Error, FsConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_with_relative_source() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("motd.txt"), b"welcome\n").unwrap();
    let path = dir.path().join("staticfs.toml");
    fs::write(
        &path,
        r#"
        dir_mode = 0o700

        [mount]
        fsname = "motd"
        auto_unmount = true

        [[files]]
        path = "/etc/motd"
        source = "motd.txt"
        mode = 0o444
        "#,
    )
    .unwrap();

    let config = FsConfig::load(&path).unwrap();
    assert_eq!(config.mount.fsname, "motd");
    assert!(config.mount.auto_unmount);

    let table = config.to_table().unwrap();
    assert_eq!(table.read("/etc/motd", 100, 0).unwrap(), b"welcome\n");
    assert_eq!(table.attributes("/etc/motd").unwrap().permissions(), 0o444);
    assert_eq!(table.attributes("/etc").unwrap().permissions(), 0o700);
}

#[test]
fn test_source_read_once() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("data.bin");
    fs::write(&source, [0_u8, 1, 2, 3]).unwrap();

    let mut config = FsConfig::default();
    config.files.push(staticfs_fuse::FileEntry {
        path: "/data.bin".to_string(),
        content: None,
        source: Some(source.clone()),
        mode: None,
    });

    let table = config.to_table().unwrap();
    fs::write(&source, b"changed").unwrap();
    assert_eq!(table.read("/data.bin", 16, 0).unwrap(), [0_u8, 1, 2, 3]);
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let err = FsConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(!err.is_config_error());
}

#[test]
fn test_missing_source_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("staticfs.toml");
    fs::write(&path, "[[files]]\npath = \"/x\"\nsource = \"gone.txt\"\n").unwrap();

    let config = FsConfig::load(&path).unwrap();
    let err = config.to_table().unwrap_err();
    match err {
        Error::Io { path, .. } => assert!(path.ends_with("gone.txt")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "files = [").unwrap();

    let err = FsConfig::load(&path).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}
