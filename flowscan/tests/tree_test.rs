//! Tests for project tree construction from a real directory.
#![allow(clippy::unwrap_used)]

use flowscan::resolve::{ModuleResolver, ProjectTree, Resolution};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_from_dir_collects_relative_normalized_paths() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("lib").join("nested")).unwrap();
    fs::write(dir.path().join("lib").join("foo.js"), "").unwrap();
    fs::write(dir.path().join("lib").join("nested").join("a.js"), "").unwrap();

    let tree = ProjectTree::from_dir(dir.path(), &[]);
    assert_eq!(tree.len(), 2);
    assert!(tree.contains("lib/foo.js"));
    assert!(tree.contains("lib/nested/a.js"));
}

#[test]
fn test_from_dir_skips_default_excluded_folders() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("node_modules").join("dep")).unwrap();
    fs::write(dir.path().join("node_modules").join("dep").join("i.js"), "").unwrap();
    fs::write(dir.path().join("main.js"), "").unwrap();

    let tree = ProjectTree::from_dir(dir.path(), &[]);
    assert_eq!(tree.paths(), ["main.js"]);
}

#[test]
fn test_from_dir_honors_extra_excludes() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("out")).unwrap();
    fs::write(dir.path().join("out").join("bundle.js"), "").unwrap();
    fs::write(dir.path().join("main.js"), "").unwrap();

    let tree = ProjectTree::from_dir(dir.path(), &["out".to_owned()]);
    assert_eq!(tree.paths(), ["main.js"]);
}

#[test]
fn test_walked_tree_feeds_the_resolver() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("lib").join("nested")).unwrap();
    fs::write(dir.path().join("lib").join("foo.js"), "").unwrap();
    fs::write(dir.path().join("lib").join("nested").join("a.js"), "").unwrap();

    let resolver = ModuleResolver::new(ProjectTree::from_dir(dir.path(), &[]));
    assert_eq!(
        resolver.resolve("nested/a"),
        Resolution::resolved("lib/nested/a.js")
    );
}
