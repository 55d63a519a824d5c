use chrono::{Local, TimeZone};
use figure::{LineGraphSpec, Plot, LineGraph};
use graph_core::archive::{dir_size, enforce_size_limit, ArchiveConfig, ArchiveManager};
use std::path::Path;
use std::time::Duration;

mod support;

fn write_entry(root: &Path, name: &str, bytes: usize) {
    let dir = root.join(name);
    std::fs::create_dir_all(dir.join("nested")).expect("create entry");
    std::fs::write(dir.join("a.png"), vec![0u8; bytes / 2]).expect("write");
    std::fs::write(dir.join("nested").join("b.png"), vec![0u8; bytes - bytes / 2])
        .expect("write nested");
}

#[test]
fn dir_size_counts_nested_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_entry(dir.path(), "one", 1000);
    write_entry(dir.path(), "two", 24);
    assert_eq!(dir_size(dir.path()).expect("size"), 1024);
}

#[test]
fn oldest_entry_is_removed_regardless_of_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_entry(dir.path(), "z-created-first", 600);
    std::thread::sleep(Duration::from_millis(20));
    write_entry(dir.path(), "a-created-second", 600);
    std::thread::sleep(Duration::from_millis(20));
    write_entry(dir.path(), "m-created-third", 600);

    let removed = enforce_size_limit(dir.path(), 1300).expect("sweep");
    assert_eq!(removed, vec![dir.path().join("z-created-first")]);
    assert_eq!(
        support::archive_dirs(dir.path()),
        vec!["a-created-second", "m-created-third"]
    );
}

#[test]
fn sweep_within_budget_removes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_entry(dir.path(), "only", 100);
    write_entry(dir.path(), "other", 100);
    assert!(enforce_size_limit(dir.path(), 200).expect("sweep").is_empty());
}

#[test]
fn disabled_manager_never_sweeps() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_entry(dir.path(), "old", 500);
    std::thread::sleep(Duration::from_millis(20));
    write_entry(dir.path(), "new", 500);
    let manager = ArchiveManager::new(
        ArchiveConfig {
            enabled: false,
            max_size_bytes: 0,
            root: dir.path().to_path_buf(),
        },
        (800, 600),
    );
    assert!(manager.sweep().expect("sweep").is_empty());
    assert_eq!(support::archive_dirs(dir.path()).len(), 2);
}

#[test]
fn same_timestamp_and_name_get_distinct_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let manager = ArchiveManager::new(
        ArchiveConfig {
            enabled: true,
            max_size_bytes: u64::MAX,
            root: dir.path().to_path_buf(),
        },
        (800, 600),
    );
    let renderer = support::FixedSizeRenderer { bytes: 10 };
    let plot = Plot::Line(LineGraph::new(LineGraphSpec::new("Graph 1", "x", "y")));
    let at = Local
        .with_ymd_and_hms(2023, 11, 2, 9, 30, 0)
        .single()
        .expect("unambiguous time");

    let first = manager
        .save_figure(&renderer, "Same", &[&plot], &at)
        .expect("first");
    let second = manager
        .save_figure(&renderer, "Same", &[&plot], &at)
        .expect("second");
    assert_ne!(first.directory, second.directory);
    assert_eq!(
        first.files,
        vec![dir
            .path()
            .join("2023-11-02 09-30-00.000 - Same")
            .join("Graph 1.png")]
    );
    assert!(second.directory.ends_with("2023-11-02 09-30-00.000 - Same (2)"));
}
