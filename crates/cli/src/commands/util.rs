use std::path::Path;

use anyhow::Result;
use hostdiff_core::db::SnapshotStore;

use crate::canonicalize_or_current;

/// Resolve `root` and open the snapshot store living there.
pub fn open_store(root: &str) -> Result<SnapshotStore> {
    let root_path = canonicalize_or_current(root)?;
    SnapshotStore::from_root(root_path)
}

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}
