use forge_fs::{LocalStorage, NormalizedPath, Storage, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("flake.nix"));

    io::write_atomic(&path, b"{ }").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "{ }");
}

#[test]
fn test_write_atomic_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nested/dir/home.nix"));

    io::write_text(&path, "{ }").unwrap();

    assert!(path.to_native().is_file());
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("configuration.nix");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("home.nix"));

    io::write_text(&path, "content").unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_failed_write_removes_temp_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("configuration.nix");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("occupied"), "x").unwrap();

    let result = io::write_text(&NormalizedPath::new(&target), "{ }");

    assert!(result.is_err());
    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["configuration.nix"]);
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/file.nix");
    assert!(io::read_text(&path).is_err());
}

#[test]
fn test_local_storage_exists_only_for_files() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::new();

    let dir = NormalizedPath::new(temp.path());
    assert!(!storage.exists(&dir));

    let file = dir.join("flake.nix");
    storage.write_text(&file, "{ }").unwrap();
    assert!(storage.exists(&file));
    assert_eq!(storage.read_text(&file).unwrap(), "{ }");
}
