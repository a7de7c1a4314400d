//! Versioned schema setup.

use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior};
use tracing::info;

use crate::error::{Result, TodoError};

/// Current schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 5;

/// Bring the database up to [`SCHEMA_VERSION`].
///
/// A no-op when the database is already current; existing tables and rows
/// are never touched.
pub fn ensure_schema(conn: &mut Connection) -> Result<()> {
    if !needs_upgrade(user_version(conn)?)? {
        return Ok(());
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    // Another connection may have upgraded while we waited for the lock.
    let current = user_version(&tx)?;
    if !needs_upgrade(current)? {
        return Ok(());
    }

    tx.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            record_json TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS filters (
            id INTEGER PRIMARY KEY,
            record_json TEXT NOT NULL
        );
        "#,
    )?;

    tx.execute(
        "INSERT OR IGNORE INTO meta (key, value) VALUES ('created_at', ?)",
        [Utc::now().to_rfc3339()],
    )?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    info!(from = current, to = SCHEMA_VERSION, "Upgraded todo database schema");
    Ok(())
}

/// Whether a database at `current` must be upgraded; newer databases are refused.
fn needs_upgrade(current: u32) -> Result<bool> {
    if current > SCHEMA_VERSION {
        return Err(TodoError::Storage(format!(
            "Database schema version {} is newer than supported version {}",
            current, SCHEMA_VERSION
        )));
    }
    Ok(current < SCHEMA_VERSION)
}

pub fn user_version(conn: &Connection) -> Result<u32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}
