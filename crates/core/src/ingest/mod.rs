//! Helpers for accepting raw snapshot documents.
//!
//! A document names its host and scan time in top-level `ip` and `timestamp`
//! fields. When either is missing, both may be recovered from an upload
//! filename of the form `host_<ip>_<timestamp>.json`, where the timestamp's
//! time portion uses `-` instead of `:` so it is filesystem-safe.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::Snapshot;

/// Error type for ingesting uploaded documents.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Snapshot document must be a JSON object")]
    NotAnObject,

    #[error("Snapshot document has an unexpected shape: {0}")]
    InvalidSnapshot(#[source] serde_json::Error),

    #[error("Missing 'ip' or 'timestamp' in JSON/filename")]
    MissingIdentity,
}

/// Host and scan time a snapshot is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotIdentity {
    pub ip: String,
    pub timestamp: String,
}

/// Caller-supplied identity pieces that take precedence over the document.
#[derive(Debug, Clone, Default)]
pub struct IdentityOverrides {
    pub ip: Option<String>,
    pub timestamp: Option<String>,
}

fn filename_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^host_(?P<ip>\d+\.\d+\.\d+\.\d+)_(?P<ts>[^.]+)\.json").ok()
        })
        .as_ref()
}

/// Recover `(ip, timestamp)` from a `host_<ip>_<timestamp>.json` filename.
///
/// Only the final path component is considered.
pub fn parse_filename_fallback(filename: &str) -> Option<(String, String)> {
    let name = Path::new(filename).file_name()?.to_str()?;
    let caps = filename_pattern()?.captures(name)?;
    let ip = caps.name("ip")?.as_str().to_string();
    let timestamp = restore_time_separators(caps.name("ts")?.as_str());
    Some((ip, timestamp))
}

/// Turn the first two `-` after the date/time `T` back into `:`.
fn restore_time_separators(raw: &str) -> String {
    let Some((date, time)) = raw.split_once('T') else {
        return raw.to_string();
    };
    format!("{date}T{}", time.replacen('-', ":", 2))
}

/// Parse uploaded bytes into a JSON object document.
///
/// The document must also read as a [`Snapshot`], so anything stored can be
/// diffed later.
pub fn parse_document(bytes: &[u8]) -> Result<Value, IngestError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(IngestError::NotAnObject);
    }
    Snapshot::from_value(&value).map_err(IngestError::InvalidSnapshot)?;
    Ok(value)
}

fn non_empty_str(document: &Value, field: &str) -> Option<String> {
    document.get(field).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Work out which host/time a document belongs to.
///
/// Precedence per piece: explicit override, then the document field, then the
/// filename fallback.
pub fn resolve_identity(
    document: &Value,
    filename: Option<&str>,
    overrides: &IdentityOverrides,
) -> Result<SnapshotIdentity, IngestError> {
    let mut ip =
        overrides.ip.clone().filter(|s| !s.is_empty()).or_else(|| non_empty_str(document, "ip"));
    let mut timestamp = overrides
        .timestamp
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| non_empty_str(document, "timestamp"));

    if ip.is_none() || timestamp.is_none() {
        if let Some((file_ip, file_ts)) = filename.and_then(parse_filename_fallback) {
            tracing::debug!(%file_ip, %file_ts, "using filename fallback for snapshot identity");
            ip = ip.or(Some(file_ip));
            timestamp = timestamp.or(Some(file_ts));
        }
    }

    match (ip, timestamp) {
        (Some(ip), Some(timestamp)) => Ok(SnapshotIdentity { ip, timestamp }),
        _ => Err(IngestError::MissingIdentity),
    }
}
