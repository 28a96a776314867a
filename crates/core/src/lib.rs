//! hostdiff-core
//!
//! Core library for ingesting network-host scan snapshots and computing
//! structural differences between any two snapshots of the same host.
//!
//! This crate defines the snapshot model, the comparison engine, the ingest
//! helpers used when accepting raw documents, and the SQLite-backed snapshot
//! store.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, HTTP service, etc.).

pub mod db;
pub mod diff;
pub mod ingest;
pub mod model;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
