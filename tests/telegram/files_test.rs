//! Tests for `src/telegram/files.rs`.

use std::path::Path;

use telegram_bridge::telegram::files::{mobile_config_path, pc_config_path, TempFiles};

#[test]
fn paths_are_per_chat() {
    let dir = Path::new("/tmp/bridge");
    assert_eq!(
        mobile_config_path(dir, 42),
        Path::new("/tmp/bridge/mobileConfig42.ovpn")
    );
    assert_eq!(
        pc_config_path(dir, -1001),
        Path::new("/tmp/bridge/pcConfig-1001.ovpn")
    );
    assert_ne!(mobile_config_path(dir, 1), mobile_config_path(dir, 2));
}

#[tokio::test]
async fn remove_all_deletes_written_files() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let a = mobile_config_path(tmp.path(), 7);
    let b = pc_config_path(tmp.path(), 7);

    let mut files = TempFiles::new();
    files.write(a.clone(), b"client\n").await.expect("write a");
    files.write(b.clone(), b"client\n").await.expect("write b");
    assert_eq!(files.paths(), &[a.clone(), b.clone()]);
    assert_eq!(std::fs::read(&a).expect("read a"), b"client\n");

    let failed = files.remove_all().await;
    assert!(failed.is_empty());
    assert!(!a.exists());
    assert!(!b.exists());
}

#[tokio::test]
async fn already_missing_file_is_not_a_failure() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let a = mobile_config_path(tmp.path(), 8);

    let mut files = TempFiles::new();
    files.write(a.clone(), b"x").await.expect("write");
    std::fs::remove_file(&a).expect("remove out of band");

    assert!(files.remove_all().await.is_empty());
}

#[tokio::test]
async fn failed_write_is_still_tracked() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let missing = tmp.path().join("no-such-dir");
    let path = mobile_config_path(&missing, 9);

    let mut files = TempFiles::new();
    assert!(files.write(path.clone(), b"x").await.is_err());
    assert_eq!(files.paths(), &[path]);
}

#[tokio::test]
async fn dropping_without_remove_all_cleans_up() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let a = pc_config_path(tmp.path(), 10);
    {
        let mut files = TempFiles::new();
        files.write(a.clone(), b"x").await.expect("write");
        assert!(a.exists());
    }
    assert!(!a.exists());
}
