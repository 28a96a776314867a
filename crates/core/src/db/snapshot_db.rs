use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::db::{SnapshotRecord, StoreStats};

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Error type for snapshot database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The database was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

/// Convenience result type for DB operations.
pub type DbResult<T> = Result<T, DbError>;

/// SQLite-backed snapshot index.
///
/// Thin wrapper around `rusqlite::Connection` responsible for opening the
/// file, applying schema migrations, and small query helpers.
#[derive(Debug)]
pub struct SnapshotDb {
    conn: Connection,
}

fn map_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<SnapshotRecord> {
    Ok(SnapshotRecord {
        ip: row.get(0)?,
        timestamp: row.get(1)?,
        path: row.get(2)?,
        sha256: row.get(3)?,
        ingested_at: row.get(4)?,
    })
}

impl SnapshotDb {
    /// Open (or create) a snapshot database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, mostly for tests.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Expose a reference to the underlying connection for advanced callers.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Record a stored snapshot.
    ///
    /// A second write for the same `(ip, timestamp)` refreshes path, digest
    /// and ingest time on the existing row instead of adding another.
    pub fn upsert_snapshot(&self, record: &SnapshotRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO snapshots (ip, timestamp, path, sha256, ingested_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(ip, timestamp) DO UPDATE SET
                path = excluded.path,
                sha256 = excluded.sha256,
                ingested_at = excluded.ingested_at
            "#,
            params![
                record.ip,
                record.timestamp,
                record.path,
                record.sha256,
                record.ingested_at
            ],
        )?;
        Ok(())
    }

    /// Distinct hosts with at least one snapshot, ascending.
    pub fn list_hosts(&self) -> DbResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT ip FROM snapshots ORDER BY ip ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Snapshot timestamps for one host, ascending.
    pub fn list_timestamps(&self, ip: &str) -> DbResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT timestamp FROM snapshots WHERE ip = ?1 ORDER BY timestamp ASC")?;
        let rows = stmt.query_map(params![ip], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Full records for one host, ordered by timestamp.
    pub fn list_snapshots(&self, ip: &str) -> DbResult<Vec<SnapshotRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT ip, timestamp, path, sha256, ingested_at
            FROM snapshots
            WHERE ip = ?1
            ORDER BY timestamp ASC
            "#,
        )?;
        let rows = stmt.query_map(params![ip], map_record)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Look up one snapshot record.
    pub fn find_snapshot(&self, ip: &str, timestamp: &str) -> DbResult<Option<SnapshotRecord>> {
        let record = self
            .conn
            .query_row(
                r#"
                SELECT ip, timestamp, path, sha256, ingested_at
                FROM snapshots
                WHERE ip = ?1 AND timestamp = ?2
                "#,
                params![ip, timestamp],
                map_record,
            )
            .optional()?;
        Ok(record)
    }

    pub fn count_snapshots(&self) -> DbResult<usize> {
        let n: i64 = self.conn.query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn stats(&self) -> DbResult<StoreStats> {
        let hosts: i64 =
            self.conn.query_row("SELECT COUNT(DISTINCT ip) FROM snapshots", [], |row| row.get(0))?;
        Ok(StoreStats { hosts: hosts as usize, snapshots: self.count_snapshots()? })
    }
}

/// Apply schema migrations to bring the database to the latest version.
///
/// We use `PRAGMA user_version` as the schema version indicator.
///
/// Version map:
/// - 0: no schema
/// - 1: snapshots index (ip, timestamp, path)
/// - 2: add sha256 and ingested_at columns
fn apply_migrations(conn: &Connection) -> DbResult<()> {
    let current_version = current_schema_version(conn)?;

    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS snapshots (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                ip        TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                path      TEXT NOT NULL,
                UNIQUE(ip, timestamp)
            );

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
    }

    if current_version < 2 {
        conn.execute_batch(
            r#"
            BEGIN;
            ALTER TABLE snapshots ADD COLUMN sha256 TEXT;
            ALTER TABLE snapshots ADD COLUMN ingested_at TEXT;

            PRAGMA user_version = 2;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

/// Read the SQLite schema version from `PRAGMA user_version`.
fn current_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
