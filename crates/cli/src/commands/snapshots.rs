use std::path::Path;

use anyhow::{anyhow, Context, Result};
use hostdiff_core::ingest::{parse_document, resolve_identity, IdentityOverrides};
use serde::Serialize;

use crate::commands::open_store;

#[derive(Serialize)]
pub struct UploadOutcome {
    pub ok: bool,
    pub ip: String,
    pub timestamp: String,
    pub path: String,
    pub sha256: String,
}

#[derive(Serialize)]
pub struct HostList {
    pub hosts: Vec<String>,
}

#[derive(Serialize)]
pub struct SnapshotList {
    pub ip: String,
    pub timestamps: Vec<String>,
}

/// Ingest one snapshot document into the store.
///
/// Host and timestamp come from `--ip`/`--timestamp`, then the document,
/// then the `host_<ip>_<timestamp>.json` filename convention.
pub fn upload_command(
    root: &str,
    file: &str,
    ip: Option<String>,
    timestamp: Option<String>,
    json: bool,
) -> Result<()> {
    let store = open_store(root)?;

    let file_path = Path::new(file);
    let bytes = std::fs::read(file_path)
        .with_context(|| format!("Failed to read snapshot file {}", file_path.display()))?;
    let document = parse_document(&bytes)?;

    let filename = file_path.file_name().and_then(|os| os.to_str());
    let identity = resolve_identity(&document, filename, &IdentityOverrides { ip, timestamp })?;
    tracing::debug!(
        ip = %identity.ip,
        timestamp = %identity.timestamp,
        "resolved snapshot identity"
    );

    let saved = store
        .save_snapshot(&identity.ip, &identity.timestamp, &document)
        .context("Failed to save snapshot")?;

    if json {
        let outcome = UploadOutcome {
            ok: true,
            ip: saved.ip,
            timestamp: saved.timestamp,
            path: saved.path.display().to_string(),
            sha256: saved.sha256,
        };
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("Uploaded snapshot:");
    println!("  IP: {}", saved.ip);
    println!("  Timestamp: {}", saved.timestamp);
    println!("  Path: {}", saved.path.display());
    println!("  SHA-256: {}", saved.sha256);

    Ok(())
}

/// List hosts that have at least one stored snapshot.
pub fn list_hosts_command(root: &str, json: bool) -> Result<()> {
    let store = open_store(root)?;
    let hosts = store.db.list_hosts().context("Failed to list hosts")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&HostList { hosts })?);
        return Ok(());
    }

    println!("Hosts:");
    if hosts.is_empty() {
        println!("(none)");
        return Ok(());
    }
    for host in hosts {
        println!("- {host}");
    }

    Ok(())
}

/// List stored snapshots for one host, oldest first.
pub fn list_snapshots_command(root: &str, ip: &str, json: bool) -> Result<()> {
    let store = open_store(root)?;

    if json {
        let timestamps = store.db.list_timestamps(ip).context("Failed to list snapshots")?;
        let list = SnapshotList { ip: ip.to_string(), timestamps };
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    let records = store.db.list_snapshots(ip).context("Failed to list snapshots")?;
    println!("Snapshots for {ip}:");
    if records.is_empty() {
        println!("(none)");
        return Ok(());
    }
    for rec in records {
        let hash = rec.sha256.as_deref().unwrap_or("(none)");
        let ingested = rec.ingested_at.as_deref().unwrap_or("(unknown)");
        println!(
            "- {} (path: {}, sha256: {}, ingested: {})",
            rec.timestamp, rec.path, hash, ingested
        );
    }

    Ok(())
}

/// Print a stored snapshot document as JSON.
pub fn show_snapshot_command(root: &str, ip: &str, timestamp: &str) -> Result<()> {
    let store = open_store(root)?;
    let document = store
        .load_document(ip, timestamp)
        .context("Failed to load snapshot")?
        .ok_or_else(|| anyhow!("Snapshot not found: {ip} @ {timestamp}"))?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
