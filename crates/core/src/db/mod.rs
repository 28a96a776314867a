//! Snapshot store: on-disk layout, configuration, and SQLite index.
//!
//! Snapshot documents live as pretty-printed JSON files under
//! `snapshots/<ip>/`; a SQLite database indexes them by `(ip, timestamp)`.
//!
//! - `StoreConfig`: serializable store metadata.
//! - `StoreLayout`: computed paths for store directories/files.
//! - `SnapshotDb`: a small SQLite wrapper with versioned schema.
//! - `SnapshotStore`: layout + config + db, with save/load/diff helpers.

pub mod config;
pub mod layout;
pub mod models;
pub mod snapshot_db;
pub mod store;
pub mod util;

pub use config::*;
pub use layout::*;
pub use models::*;
pub use snapshot_db::*;
pub use store::*;
pub use util::*;
