//! Database connection management

#![allow(clippy::result_large_err)]

use std::path::Path;

use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(from_rusqlite)?;

    // journal_mode answers with the resulting mode, so it has to be queried
    let _mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Open, configure and migrate the database at `path`
///
/// Migration seeds the initial closed session, so the result is always ready
/// for `StateRepo::is_queue_open`.
pub fn initialize<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let mut conn = open(&path)?;
    configure(&conn)?;
    apply_migrations(&mut conn)?;
    tracing::debug!(path = %path.as_ref().display(), "database ready");
    Ok(conn)
}

/// In-memory counterpart of `initialize`
pub fn initialize_in_memory() -> Result<Connection> {
    let mut conn = open_in_memory()?;
    configure(&conn)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}
