use anyhow::{Context, Result};
use hostdiff_core::db::{init_store, StoreLayout, StoreStats};
use serde::Serialize;

use crate::commands::{open_store, print_dir_status};
use crate::{canonicalize_or_current, infer_store_name};

#[derive(Serialize)]
pub struct StoreStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub name: String,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub db_path: String,
    pub snapshots_dir: String,
    pub stats: StoreStats,
}

/// Initialize a new snapshot store at `root`.
pub fn init_store_command(root: &str, name: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = StoreLayout::new(&root_path);

    let store_name = name.unwrap_or_else(|| infer_store_name(&root_path));
    let config = init_store(&layout, &store_name)?;

    println!("Initialized snapshot store:");
    println!("  Name: {}", config.name);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  DB path (relative): {}", config.db.path);
    println!("  Snapshots dir: {}", layout.resolve(&config.snapshots_dir).display());

    Ok(())
}

/// Report store health: config, paths, and what it holds.
pub fn status_command(root: &str, json: bool) -> Result<()> {
    let store = open_store(root)?;
    let stats = store.db.stats().context("Failed to count snapshots")?;
    let snapshots_dir = store.snapshots_dir();

    if json {
        let status = StoreStatus {
            status: "ok",
            version: hostdiff_core::version(),
            name: store.config.name.clone(),
            root: store.layout.root.display().to_string(),
            config_file: store.layout.config_path.display().to_string(),
            config_version: store.config.config_version.clone(),
            db_path: store.db_path.display().to_string(),
            snapshots_dir: snapshots_dir.display().to_string(),
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("Snapshot Store Status");
    println!("=====================");
    println!("Name: {}", store.config.name);
    println!("Root: {}", store.layout.root.display());
    println!("Config file: {}", store.layout.config_path.display());
    println!("Config version: {}", store.config.config_version);
    println!("DB path (config): {}", store.config.db.path);
    println!();
    println!("Directories:");
    print_dir_status("Meta dir (.hostdiff)", &store.layout.meta_dir);
    print_dir_status("Snapshots dir", &snapshots_dir);
    println!();
    println!("Hosts: {}", stats.hosts);
    println!("Snapshots: {}", stats.snapshots);

    Ok(())
}
