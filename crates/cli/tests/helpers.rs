use std::fs;
use std::path::Path;

use host_diff::{canonicalize_or_current, infer_store_name};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let result = canonicalize_or_current(".").expect("canonicalize");
    assert_eq!(result, std::env::current_dir().expect("cwd"));
}

#[test]
fn canonicalize_or_current_resolves_existing_absolute_path() {
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");

    let result = canonicalize_or_current(subdir.to_str().unwrap()).expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));
}

#[test]
fn canonicalize_or_current_joins_missing_relative_path() {
    let result = canonicalize_or_current("does-not-exist-yet").expect("canonicalize");
    assert_eq!(result, std::env::current_dir().unwrap().join("does-not-exist-yet"));
}

#[test]
fn infer_store_name_uses_last_path_component() {
    assert_eq!(infer_store_name(Path::new("/srv/scan-history")), "scan-history");
}

#[test]
fn infer_store_name_falls_back_when_missing() {
    assert_eq!(infer_store_name(Path::new("/")), "snapshots");
}
