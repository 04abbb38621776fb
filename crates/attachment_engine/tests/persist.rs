use std::fs;

use attachment_engine::{OutputDir, PersistError};
use tempfile::TempDir;

fn entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn nested_output_dir_is_created_on_demand() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("cases").join("12");

    OutputDir::new(&nested).ensure().unwrap();
    assert!(nested.is_dir());

    // A second call on an existing directory is fine.
    OutputDir::new(&nested).ensure().unwrap();
}

#[test]
fn a_file_in_the_way_is_reported() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("downloads");
    fs::write(&file_path, "x").unwrap();

    let err = OutputDir::new(&file_path).ensure().unwrap_err();
    assert!(matches!(err, PersistError::NotADirectory(ref path) if path == &file_path));
}

#[test]
fn saving_twice_keeps_the_latest_download_only() {
    let temp = TempDir::new().unwrap();
    let output = OutputDir::new(temp.path());

    let first = output.save("files-2025-05-06-0.zip", b"first").unwrap();
    let second = output.save("files-2025-05-06-0.zip", b"second").unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
    assert_eq!(entries(temp.path()), vec!["files-2025-05-06-0.zip"]);
}

#[test]
fn failed_save_leaves_no_file_behind() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = OutputDir::new(&blocker).save("file-1.pdf", b"data");

    assert!(result.is_err());
    assert_eq!(entries(temp.path()), vec!["not_a_dir"]);
}
