use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::db::{SnapshotDb, StoreConfig, StoreLayout};

/// Load the store config JSON from disk for a given layout.
pub fn load_store_config(layout: &StoreLayout) -> Result<StoreConfig> {
    let config_json = std::fs::read_to_string(&layout.config_path).with_context(|| {
        format!("Failed to read store config at {}", layout.config_path.display())
    })?;
    let config: StoreConfig =
        serde_json::from_str(&config_json).context("Failed to parse store config JSON")?;
    Ok(config)
}

/// Resolve the DB path (respecting relative/absolute config) and open a SnapshotDb.
pub fn open_store_db(layout: &StoreLayout) -> Result<(StoreConfig, PathBuf, SnapshotDb)> {
    let config = load_store_config(layout)?;
    let db_path = layout.resolve(&config.db.path);
    let db = SnapshotDb::open(&db_path)
        .with_context(|| format!("Failed to open snapshot database at {}", db_path.display()))?;
    Ok((config, db_path, db))
}

/// Create the store directories, write a fresh config, and create the database.
///
/// An existing config is left untouched so re-running is harmless.
pub fn init_store(layout: &StoreLayout, name: &str) -> Result<StoreConfig> {
    std::fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    std::fs::create_dir_all(&layout.snapshots_dir).with_context(|| {
        format!("Failed to create snapshots dir: {}", layout.snapshots_dir.display())
    })?;

    let config = if layout.config_path.exists() {
        load_store_config(layout)?
    } else {
        let config = StoreConfig::new(
            name,
            layout.db_path_relative_string(),
            layout.snapshots_dir_relative_string(),
        );
        let json = serde_json::to_string_pretty(&config)?;
        std::fs::write(&layout.config_path, json).with_context(|| {
            format!("Failed to write store config: {}", layout.config_path.display())
        })?;
        config
    };

    let db_path = layout.resolve(&config.db.path);
    SnapshotDb::open(&db_path).with_context(|| {
        format!("Failed to initialize snapshot database at {}", db_path.display())
    })?;
    tracing::info!(root = %layout.root.display(), "initialized snapshot store");
    Ok(config)
}
