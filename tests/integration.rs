//! Integration tests for ndc, driving a shell stand-in for the NDC binary
#![cfg(unix)]

use chrono::NaiveDate;
use ndc::*;
use std::collections::BTreeSet;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const FAKE_NDC: &str = include_str!("fixtures/fake-ndc.sh");

/// Scripts are written once, before any test spawns them
fn bin_dir() -> &'static Path {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("fake-ndc");
        fs::create_dir_all(&dir).expect("Failed to create script directory");
        write_script(&dir.join("ndc"), FAKE_NDC);
        write_script(
            &dir.join("ndc-alpha05"),
            "#!/bin/sh\necho 'NDC Ver.0 alpha05'\necho 'usage: ndc'\n",
        );
        dir
    })
}

fn write_script(path: &Path, contents: &str) {
    fs::write(path, contents).expect("Failed to write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("Failed to mark script executable");
}

fn open() -> Ndc {
    Ndc::builder()
        .bin(bin_dir().join("ndc"))
        .profile(Profile::unix())
        .build()
        .expect("Failed to start fake ndc")
}

fn expected() -> Entry {
    Entry {
        name: "A".to_string(),
        size: String::new(),
        entry_type: "15".to_string(),
        modified_at: NaiveDate::from_ymd_opt(2017, 12, 7)
            .unwrap()
            .and_hms_opt(7, 36, 44)
            .unwrap(),
    }
}

#[test]
fn test_version() {
    let ndc = open();
    assert_eq!(ndc.version(), "NDC Ver.0 alpha06");
}

#[test]
fn test_unsupported_version() {
    let err = Ndc::builder()
        .bin(bin_dir().join("ndc-alpha05"))
        .build()
        .unwrap_err();
    assert!(matches!(err, NdcError::UnsupportedVersion(ref v) if v == "NDC Ver.0 alpha05"));
}

#[test]
fn test_missing_binary() {
    let err = Ndc::new(bin_dir().join("does-not-exist")).unwrap_err();
    assert!(matches!(err, NdcError::Spawn { .. }));
}

#[test]
fn test_list() {
    assert_eq!(open().list("fixture.fdi", "", 0).unwrap(), vec![expected()]);
}

#[test]
fn test_find() {
    let ndc = open();
    assert_eq!(ndc.find("fixture.fdi", "A", "", 0).unwrap(), Some(expected()));
    assert_eq!(ndc.find("fixture.fdi", "Z", "", 0).unwrap(), None);
}

#[test]
fn test_find_all() {
    let ndc = open();
    assert_eq!(ndc.find_all("fixture.fdi", "A", "", 0).unwrap(), vec![expected()]);
    assert!(ndc.find_all("fixture.fdi", "Z", "", 0).unwrap().is_empty());
}

#[test]
fn test_list_skips_dot_entries() {
    let ndc = open();
    for path in ["", "GAMES", "GAMES/RPG", "DOCS"] {
        let entries = ndc.list("tree.fdi", path, 0).unwrap();
        assert!(entries.iter().all(|e| e.name != "." && e.name != ".."), "{}", path);
    }

    let names: Vec<String> = ndc
        .list("tree.fdi", "GAMES", 0)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["VOLUME", "RPG", "PUZZLE.EXE"]);
}

#[test]
fn test_tool_errors() {
    let ndc = open();

    let err = ndc.list("missing.fdi", "", 0).unwrap_err();
    assert_eq!(err.tool_kind(), Some(ToolErrorKind::InvalidImagePath));

    let err = ndc.list("tree.fdi", "", 3).unwrap_err();
    assert_eq!(err.tool_kind(), Some(ToolErrorKind::InvalidPartition));

    let err = ndc.list("tree.fdi", "NOPE", 0).unwrap_err();
    assert_eq!(err.tool_kind(), Some(ToolErrorKind::FileNotFound));

    let err = ndc.get("tree.fdi", "README.TXT", "/nonexistent/dest", 0).unwrap_err();
    assert_eq!(err.tool_kind(), Some(ToolErrorKind::InvalidDestinationPath));

    let err = ndc.put("tree.fdi", "/nonexistent/file.txt", "DOCS", 0).unwrap_err();
    assert_eq!(err.tool_kind(), Some(ToolErrorKind::InvalidSourcePath));
}

#[test]
fn test_unknown_tool_error() {
    let err = open().list("broken.fdi", "", 0).unwrap_err();
    match err {
        NdcError::Tool { kind, message } => {
            assert_eq!(kind, ToolErrorKind::Unknown);
            assert_eq!(message, "内部エラーが発生しました。");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_put_and_delete() {
    let ndc = open();
    let src = tempfile::NamedTempFile::new().unwrap();
    let dir = tempfile::tempdir().unwrap();

    ndc.put("tree.fdi", src.path(), "DOCS", 0).unwrap();
    ndc.put_directory("tree.fdi", dir.path(), "", 0).unwrap();
    ndc.delete("tree.fdi", "DOCS/MANUAL.TXT", 0).unwrap();

    let err = ndc.put("tree.fdi", src.path(), "FULL", 0).unwrap_err();
    assert_eq!(err.tool_kind(), Some(ToolErrorKind::FileStorageFailure));
}

#[test]
fn test_get() {
    let ndc = open();
    let dest = tempfile::tempdir().unwrap();
    ndc.get("tree.fdi", "GAMES/RPG/HERO.EXE", dest.path(), 0).unwrap();
    assert_eq!(
        fs::read_to_string(dest.path().join("HERO.EXE")).unwrap(),
        "GAMES/RPG/HERO.EXE\n"
    );
}

#[test]
fn test_walk_visits_each_directory_once() {
    let ndc = open();
    let levels: Vec<WalkLevel> = ndc.walk("tree.fdi", "", 0).collect::<Result<_>>().unwrap();

    let paths: Vec<&str> = levels.iter().map(|l| l.path.as_str()).collect();
    assert_eq!(paths, vec!["", "GAMES", "GAMES/RPG", "DOCS"]);

    let files: BTreeSet<String> = levels.iter().flat_map(|l| l.files.clone()).collect();
    assert_eq!(
        files,
        ["HERO.EXE", "MANUAL.TXT", "PUZZLE.EXE", "README.TXT", "SAVE.DAT"]
            .into_iter()
            .map(String::from)
            .collect()
    );
}

fn native_children(dir: &Path) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut dirs = BTreeSet::new();
    let mut files = BTreeSet::new();
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().unwrap().is_dir() {
            dirs.insert(name);
        } else {
            files.insert(name);
        }
    }
    (dirs, files)
}

#[test]
fn test_extract_round_trip() {
    let ndc = open();
    let dest = tempfile::tempdir().unwrap();

    let summary = ndc.extract("tree.fdi", dest.path(), 0).unwrap();
    assert_eq!(summary, ExtractSummary { files: 5, directories: 3 });

    for level in ndc.walk("tree.fdi", "", 0) {
        let level = level.unwrap();
        let (dirs, files) = native_children(&ndc.native_path(dest.path(), &level.path));
        assert_eq!(dirs, level.directories.iter().cloned().collect(), "{}", level.path);
        assert_eq!(files, level.files.iter().cloned().collect(), "{}", level.path);
    }

    assert_eq!(
        fs::read_to_string(dest.path().join("GAMES/RPG/SAVE.DAT")).unwrap(),
        "GAMES/RPG/SAVE.DAT\n"
    );
}

#[test]
fn test_render_tree() {
    let tree = open().render_tree("tree.fdi", "", 0).unwrap();
    assert_eq!(
        tree,
        "/\n  README.TXT\n  GAMES\n    RPG\n      HERO.EXE\n      SAVE.DAT\n    PUZZLE.EXE\n  DOCS\n    MANUAL.TXT\n"
    );
}
