//! End-to-end tests for the `repo-harvest archive` command.

mod common;
use common::prelude::*;
use std::fs::File;
use zip::ZipArchive;

fn entry_names(path: &std::path::Path) -> Vec<String> {
    let file = File::open(path).unwrap();
    let archive = ZipArchive::new(file).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[test]
fn test_archive_each_repository_directory() {
    let fixture = TestFixture::new()
        .with_file("repos/.gitkeep", "")
        .with_file("repos/alpha/README.md", "# alpha\n")
        .with_file("repos/alpha/src/lib.rs", "pub fn alpha() {}\n")
        .with_file("repos/beta/notes.txt", "beta\n");

    fixture
        .command()
        .arg("archive")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Archived 2 of 2 repositories"));

    fixture
        .child("archives/alpha.zip")
        .assert(predicate::path::is_file());
    fixture
        .child("archives/beta.zip")
        .assert(predicate::path::is_file());
    fixture
        .child("archives/.gitkeep.zip")
        .assert(predicate::path::missing());

    // Entries are relative to the repository directory itself
    assert_eq!(
        entry_names(&fixture.path().join("archives/alpha.zip")),
        vec!["README.md", "src/", "src/lib.rs"]
    );
}

#[test]
fn test_archive_overwrites_existing_archive() {
    let fixture = TestFixture::new()
        .with_file("repos/alpha/new.txt", "new\n")
        .with_file("archives/alpha.zip", "stale bytes");

    fixture.command().arg("archive").assert().success();

    assert_eq!(
        entry_names(&fixture.path().join("archives/alpha.zip")),
        vec!["new.txt"]
    );
}

#[test]
fn test_archive_custom_directories_and_level() {
    let fixture = TestFixture::new().with_file("clones/gamma/data.txt", "gamma\n");

    fixture
        .command()
        .args([
            "archive",
            "--repos-dir",
            "clones",
            "--archives-dir",
            "out",
            "--compression-level",
            "0",
        ])
        .assert()
        .success();

    fixture
        .child("out/gamma.zip")
        .assert(predicate::path::is_file());
}

#[test]
fn test_archive_empty_repos_directory() {
    let fixture = TestFixture::new().with_file("repos/.gitkeep", "");

    fixture
        .command()
        .arg("archive")
        .assert()
        .success()
        .stdout(predicate::str::contains("Archived 0 of 0 repositories"));
}

#[test]
fn test_archive_missing_repos_directory_fails() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("archive")
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}
