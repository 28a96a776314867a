use serde::{Deserialize, Serialize};

/// Location of the snapshot index database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Path to the database file (typically relative to the store root).
    pub path: String,
}

impl DbConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Serializable configuration describing a snapshot store.
///
/// This lives at `.hostdiff/store.json` in the store root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Human-friendly store name.
    pub name: String,
    /// Optional description / notes.
    pub description: Option<String>,
    /// Config format version.
    pub config_version: String,
    /// Database configuration (path is typically relative to the store root).
    pub db: DbConfig,
    /// Directory holding snapshot documents (typically relative to the store root).
    pub snapshots_dir: String,
}

impl StoreConfig {
    /// Create a new store configuration using the given name and paths.
    pub fn new(
        name: impl Into<String>,
        db_path: impl Into<String>,
        snapshots_dir: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            db: DbConfig::new(db_path),
            snapshots_dir: snapshots_dir.into(),
        }
    }
}
