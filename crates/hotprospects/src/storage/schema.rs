//! `SQLite` schema for the key-value defaults database.
//!
//! The layout version lives in `PRAGMA user_version`, so no bookkeeping
//! table is needed. A fresh file reports version 0.

use rusqlite::Connection;

use crate::error::{Error, Result};

/// Layout version written by this build.
pub const SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the defaults table.
pub const CREATE_DEFAULTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS defaults (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// Bring a freshly opened connection up to [`SCHEMA_VERSION`].
///
/// # Errors
///
/// Returns an error if the file is not a database, the table cannot be
/// created, or the file was written by a newer layout.
pub fn prepare(conn: &Connection) -> Result<()> {
    // Reading the pragma is the first real access, so a junk file fails here.
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if version > SCHEMA_VERSION {
        return Err(Error::DatabaseSchema {
            message: format!(
                "layout {version} is newer than this build understands ({SCHEMA_VERSION})"
            ),
        });
    }

    conn.execute_batch(CREATE_DEFAULTS_TABLE)?;
    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}
