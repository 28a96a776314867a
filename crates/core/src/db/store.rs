use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::db::{
    open_store_db, snapshot_file_name, DbError, SnapshotDb, SnapshotRecord, StoreConfig,
    StoreLayout,
};
use crate::diff::{diff_snapshots, HostDiff};
use crate::model::Snapshot;

/// Error type for snapshot store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed snapshot document: {0}")]
    Json(#[from] serde_json::Error),

    /// Host or timestamp would escape the snapshots directory.
    #[error("Invalid {field} '{value}': must not contain path separators or '..'")]
    InvalidIdentity { field: &'static str, value: String },

    #[error("One or both snapshots not found")]
    SnapshotNotFound,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of saving a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SavedSnapshot {
    pub ip: String,
    pub timestamp: String,
    /// Absolute path of the written document.
    pub path: PathBuf,
    pub sha256: String,
}

/// Hex SHA-256 of a byte slice.
pub fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn check_identity_part(field: &'static str, value: &str) -> StoreResult<()> {
    let bad = value.is_empty()
        || value == "."
        || value.contains("..")
        || value.contains('/')
        || value.contains('\\')
        || value.contains('\0');
    if bad {
        return Err(StoreError::InvalidIdentity { field, value: value.to_string() });
    }
    Ok(())
}

/// A snapshot store opened from its root: layout, config, and index database.
#[derive(Debug)]
pub struct SnapshotStore {
    pub layout: StoreLayout,
    pub config: StoreConfig,
    pub db_path: PathBuf,
    pub db: SnapshotDb,
}

impl SnapshotStore {
    /// Load store config and open the database for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = StoreLayout::new(root);
        let (config, db_path, db) = open_store_db(&layout)?;
        Ok(Self { layout, config, db_path, db })
    }

    /// Directory holding snapshot documents, as configured.
    pub fn snapshots_dir(&self) -> PathBuf {
        self.layout.resolve(&self.config.snapshots_dir)
    }

    /// Write a document to `snapshots/<ip>/<timestamp>.json` and index it.
    ///
    /// Saving the same `(ip, timestamp)` again overwrites the file and leaves
    /// a single index row.
    pub fn save_snapshot(
        &self,
        ip: &str,
        timestamp: &str,
        document: &Value,
    ) -> StoreResult<SavedSnapshot> {
        check_identity_part("ip", ip)?;
        check_identity_part("timestamp", timestamp)?;

        let host_dir = self.snapshots_dir().join(ip);
        std::fs::create_dir_all(&host_dir)
            .map_err(|source| StoreError::Io { path: host_dir.clone(), source })?;

        let file_path = host_dir.join(snapshot_file_name(timestamp));
        let body = serde_json::to_vec_pretty(document)?;
        std::fs::write(&file_path, &body)
            .map_err(|source| StoreError::Io { path: file_path.clone(), source })?;

        let sha256 = sha256_bytes(&body);
        let record = SnapshotRecord {
            ip: ip.to_string(),
            timestamp: timestamp.to_string(),
            path: self.layout.relative_string(&file_path),
            sha256: Some(sha256.clone()),
            ingested_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        };
        self.db.upsert_snapshot(&record)?;
        tracing::info!(%ip, %timestamp, path = %file_path.display(), "saved snapshot");

        Ok(SavedSnapshot {
            ip: record.ip,
            timestamp: record.timestamp,
            path: file_path,
            sha256,
        })
    }

    /// Raw JSON document for a stored snapshot.
    ///
    /// `None` when the pair is not indexed or its file has gone missing.
    pub fn load_document(&self, ip: &str, timestamp: &str) -> StoreResult<Option<Value>> {
        let Some(record) = self.db.find_snapshot(ip, timestamp)? else {
            return Ok(None);
        };
        let path = self.layout.resolve(&record.path);
        let body = match std::fs::read(&path) {
            Ok(body) => body,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "indexed snapshot file is missing");
                return Ok(None);
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// Typed snapshot for a stored document.
    pub fn load_snapshot(&self, ip: &str, timestamp: &str) -> StoreResult<Option<Snapshot>> {
        match self.load_document(ip, timestamp)? {
            Some(doc) => Ok(Some(Snapshot::from_value(&doc)?)),
            None => Ok(None),
        }
    }

    /// Diff two stored snapshots of one host, `ts1` being the baseline.
    pub fn diff(&self, ip: &str, ts1: &str, ts2: &str) -> StoreResult<HostDiff> {
        let old = self.load_snapshot(ip, ts1)?;
        let new = self.load_snapshot(ip, ts2)?;
        let (Some(old), Some(new)) = (old, new) else {
            return Err(StoreError::SnapshotNotFound);
        };
        Ok(HostDiff {
            ip: ip.to_string(),
            ts1: ts1.to_string(),
            ts2: ts2.to_string(),
            diff: diff_snapshots(&old, &new),
        })
    }
}
