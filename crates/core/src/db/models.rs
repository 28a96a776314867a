use serde::{Deserialize, Serialize};

/// Row of the snapshot index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub ip: String,
    pub timestamp: String,
    /// Path to the JSON document, relative to the store root if possible.
    pub path: String,
    /// SHA-256 of the stored document bytes. Absent for rows written before
    /// schema v2.
    pub sha256: Option<String>,
    /// When the document was ingested (UTC, RFC 3339).
    pub ingested_at: Option<String>,
}

impl SnapshotRecord {
    pub fn new(
        ip: impl Into<String>,
        timestamp: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            ip: ip.into(),
            timestamp: timestamp.into(),
            path: path.into(),
            sha256: None,
            ingested_at: None,
        }
    }
}

/// Counts reported by `status`-style summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreStats {
    pub hosts: usize,
    pub snapshots: usize,
}
