mod common;

use tempfile::TempDir;
use unpacker_engine::PackageArchive;

use common::write_archive;

#[test]
fn reads_entries_and_preserves_archive_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("demo.crx");
    write_archive(
        &path,
        &[
            ("manifest.json", "{}"),
            ("js/app.js", "var app = 1;"),
            ("page.htm", "<html></html>"),
        ],
    );

    let mut archive = PackageArchive::open(&path).unwrap();
    assert_eq!(
        archive.entry_names(),
        &["manifest.json", "js/app.js", "page.htm"]
    );
    assert_eq!(archive.read_entry("js/app.js"), b"var app = 1;");
}

#[test]
fn normalizes_requested_names() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("demo.crx");
    write_archive(&path, &[("js/app.js", "var app = 1;")]);

    let mut archive = PackageArchive::open(&path).unwrap();
    assert_eq!(archive.read_entry("./js/app.js?v=2"), b"var app = 1;");
    assert_eq!(archive.read_entry("/js/app.js"), b"var app = 1;");
}

#[test]
fn falls_back_to_case_insensitive_lookup() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("demo.crx");
    write_archive(&path, &[("Manifest.json", r#"{"name": "shouty"}"#)]);

    let mut archive = PackageArchive::open(&path).unwrap();
    assert_eq!(
        archive.read_entry("manifest.json"),
        br#"{"name": "shouty"}"#
    );
}

#[test]
fn missing_entries_read_as_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("demo.crx");
    write_archive(&path, &[("present.js", "var x;")]);

    let mut archive = PackageArchive::open(&path).unwrap();
    assert!(archive.read_entry("absent.js").is_empty());
    // The archive stays usable afterwards.
    assert_eq!(archive.read_entry("present.js"), b"var x;");
}

#[test]
fn rejects_files_that_are_not_archives() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("not-a-zip.crx");
    std::fs::write(&path, "plain text, no zip magic").unwrap();

    assert!(PackageArchive::open(&path).is_err());
}
