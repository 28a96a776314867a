use std::path::{Path, PathBuf};

/// Logical layout of a snapshot store on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    /// Root directory of the store.
    pub root: PathBuf,
    /// Directory for internal metadata (.hostdiff).
    pub meta_dir: PathBuf,
    /// Path to the store config file (JSON).
    pub config_path: PathBuf,
    /// Path to the snapshot index database.
    pub db_path: PathBuf,
    /// Directory for snapshot documents, one subdirectory per host.
    pub snapshots_dir: PathBuf,
}

impl StoreLayout {
    /// Compute the default layout for a store rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".hostdiff");
        let config_path = meta_dir.join("store.json");
        let db_path = meta_dir.join("snapshots.db");
        let snapshots_dir = root.join("snapshots");

        Self { root, meta_dir, config_path, db_path, snapshots_dir }
    }

    /// `path` relative to `root` when possible, for storing in config/DB rows.
    pub fn relative_string(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => path.to_string_lossy().to_string(),
        }
    }

    /// Resolve a possibly-relative stored path against `root`.
    pub fn resolve(&self, stored: &str) -> PathBuf {
        let path = Path::new(stored);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn db_path_relative_string(&self) -> String {
        self.relative_string(&self.db_path)
    }

    pub fn snapshots_dir_relative_string(&self) -> String {
        self.relative_string(&self.snapshots_dir)
    }
}

/// File name a snapshot is written under: `:` becomes `-` so it is safe on
/// every filesystem.
pub fn snapshot_file_name(timestamp: &str) -> String {
    format!("{}.json", timestamp.replace(':', "-"))
}
