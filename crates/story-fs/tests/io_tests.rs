use std::fs;

use pretty_assertions::assert_eq;
use story_fs::{Error, NormalizedPath, io};
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nested/deeper/ledger.yaml"));

    io::write_text(&path, "development_status:\n").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "development_status:\n");
}

#[test]
fn test_write_atomic_overwrites_and_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("ledger.yaml");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {:?}", leftovers);
}

#[test]
fn test_read_text_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.yaml"));

    let err = io::read_text(&path).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_read_text_rejects_invalid_utf8() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("broken.md");
    fs::write(&file_path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

    let result = io::read_text(&NormalizedPath::new(&file_path));
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_list_files_filters_and_sorts() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("2-a-second.md"), "").unwrap();
    fs::write(temp.path().join("1-a-first.md"), "").unwrap();
    fs::write(temp.path().join("sprint-status.yaml"), "").unwrap();
    fs::create_dir(temp.path().join("subdir.md")).unwrap();

    let files = io::list_files(&NormalizedPath::new(temp.path()), "md").unwrap();
    let names: Vec<_> = files.iter().filter_map(|p| p.file_name()).collect();

    assert_eq!(names, vec!["1-a-first.md", "2-a-second.md"]);
}

#[test]
fn test_list_files_on_missing_dir_fails() {
    let temp = TempDir::new().unwrap();
    let result = io::list_files(&NormalizedPath::new(temp.path().join("nope")), "md");
    assert!(matches!(result, Err(Error::NotADirectory { .. })));
}

#[test]
fn test_file_size_reports_bytes() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("story.md");
    fs::write(&file_path, "12345").unwrap();

    assert_eq!(io::file_size(&NormalizedPath::new(&file_path)).unwrap(), 5);
}
