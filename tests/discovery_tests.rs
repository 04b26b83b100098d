//! Translator and fixture discovery on real directory trees.

use std::fs;

use tempfile::TempDir;
use translator_snapshots::discovery::{translator_name, TranslatorLocator};
use translator_snapshots::{HarnessError, Mode};

fn packages() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    for dir in [
        "translator-default/test/fixtures/attrs",
        "translator-default/test/fixtures/basic",
        "translator-tags/test/fixtures/counter",
        "translator-empty",
        "compiler/test/fixtures/ignored",
        "babel-utils",
    ] {
        fs::create_dir_all(root.path().join(dir)).unwrap();
    }
    fs::write(root.path().join("translator-file"), "not a package").unwrap();
    fs::write(
        root.path().join("translator-default/test/fixtures/README.md"),
        "not a fixture",
    )
    .unwrap();
    root
}

#[test]
fn test_translator_name_pattern() {
    assert_eq!(translator_name("translator-default"), Some("default"));
    assert_eq!(translator_name("translator-tags-api"), Some("tags-api"));
    assert_eq!(translator_name("translator-"), None);
    assert_eq!(translator_name("my-translator-x"), None);
    assert_eq!(translator_name("compiler"), None);
}

#[test]
fn test_locates_translator_directories_sorted() {
    let root = packages();
    let translators = TranslatorLocator::new(root.path()).locate().unwrap();

    let names: Vec<&str> = translators.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["default", "empty", "tags"]);
    assert_eq!(
        translators[0].fixture_root,
        root.path().join("translator-default").join("test").join("fixtures")
    );
}

#[test]
fn test_no_translators_is_empty_not_error() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("compiler")).unwrap();

    let translators = TranslatorLocator::new(root.path()).locate().unwrap();

    assert!(translators.is_empty());
}

#[test]
fn test_missing_packages_root_is_io_error() {
    let root = tempfile::tempdir().unwrap();
    let err = TranslatorLocator::new(root.path().join("nope"))
        .locate()
        .unwrap_err();

    assert!(matches!(err, HarnessError::Io { .. }));
}

#[test]
fn test_fixture_dirs_are_sorted_subdirectories() {
    let root = packages();
    let translators = TranslatorLocator::new(root.path()).locate().unwrap();

    let fixtures: Vec<String> = translators[0]
        .fixture_dirs()
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(fixtures, vec!["attrs", "basic"]);
}

#[test]
fn test_translator_without_fixture_root_has_no_fixtures() {
    let root = packages();
    let translators = TranslatorLocator::new(root.path()).locate().unwrap();
    let empty = translators.iter().find(|t| t.name == "empty").unwrap();

    assert!(empty.fixture_dirs().unwrap().is_empty());
}

#[test]
fn test_every_translator_registers_all_modes() {
    let root = packages();
    for translator in TranslatorLocator::new(root.path()).locate().unwrap() {
        assert_eq!(translator.modes(), &Mode::ALL[..]);
    }
}
