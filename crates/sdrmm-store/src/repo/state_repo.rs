//! Point queries over bans, per-user counters and the session log
//!
//! Every operation is a single statement (or a lazy insert followed by a
//! read). Nothing here spans a transaction, so a read-modify-write of a
//! counter done by the caller is not atomic.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

use sdrmm_core::model::{QueueStatus, UserCounters};

use crate::errors::{from_rusqlite, session_missing, Result};

/// SQLite repository for the coordinator's local state
pub struct StateRepo;

impl StateRepo {
    // ===== Counters =====

    /// Create the counter row for `username` if it does not exist yet
    fn ensure_user(conn: &Connection, username: &str) -> Result<()> {
        conn.execute(
            "INSERT OR IGNORE INTO user_counters (username) VALUES (?1)",
            [username],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Both counters for `username`, created at zero on first read
    pub fn get_counters(conn: &Connection, username: &str) -> Result<UserCounters> {
        Self::ensure_user(conn, username)?;
        conn.query_row(
            "SELECT successful_requests, requests_in_queue FROM user_counters WHERE username = ?1",
            [username],
            |row| Ok(UserCounters::new(row.get(0)?, row.get(1)?)),
        )
        .map_err(from_rusqlite)
    }

    pub fn get_user_requests(conn: &Connection, username: &str) -> Result<i64> {
        Ok(Self::get_counters(conn, username)?.successful_requests)
    }

    pub fn get_user_requests_in_queue(conn: &Connection, username: &str) -> Result<i64> {
        Ok(Self::get_counters(conn, username)?.requests_in_queue)
    }

    pub fn set_user_requests(conn: &Connection, username: &str, count: i64) -> Result<()> {
        conn.execute(
            "INSERT INTO user_counters (username, successful_requests) VALUES (?1, ?2)
             ON CONFLICT(username) DO UPDATE SET
                successful_requests = excluded.successful_requests",
            rusqlite::params![username, count],
        )
        .map_err(from_rusqlite)?;
        tracing::debug!(username, count, "successful_requests set");
        Ok(())
    }

    pub fn set_user_requests_in_queue(conn: &Connection, username: &str, count: i64) -> Result<()> {
        conn.execute(
            "INSERT INTO user_counters (username, requests_in_queue) VALUES (?1, ?2)
             ON CONFLICT(username) DO UPDATE SET
                requests_in_queue = excluded.requests_in_queue",
            rusqlite::params![username, count],
        )
        .map_err(from_rusqlite)?;
        tracing::debug!(username, count, "requests_in_queue set");
        Ok(())
    }

    /// Zero both counters for every known user
    pub fn clear_all_counters(conn: &Connection) -> Result<()> {
        let users = conn
            .execute(
                "UPDATE user_counters SET successful_requests = 0, requests_in_queue = 0",
                [],
            )
            .map_err(from_rusqlite)?;
        tracing::debug!(users, "counters cleared");
        Ok(())
    }

    // ===== Bans =====

    /// Add `id` to the ban list; banning twice keeps one row
    pub fn ban_map(conn: &Connection, id: &str, hash: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO banned_maps (id, hash) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET hash = excluded.hash",
            [id, hash],
        )
        .map_err(from_rusqlite)?;
        tracing::debug!(map_id = id, "map banned");
        Ok(())
    }

    /// Remove `id` from the ban list; a no-op if it was not banned
    pub fn unban_map(conn: &Connection, id: &str) -> Result<()> {
        conn.execute("DELETE FROM banned_maps WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;
        tracing::debug!(map_id = id, "map unbanned");
        Ok(())
    }

    pub fn is_banned(conn: &Connection, id: &str) -> Result<bool> {
        let found = conn
            .query_row("SELECT 1 FROM banned_maps WHERE id = ?1", [id], |_| Ok(()))
            .optional()
            .map_err(from_rusqlite)?;
        Ok(found.is_some())
    }

    // ===== Session log =====

    /// Append a closed session row
    ///
    /// The row is never placed before the current latest session, so the new
    /// session becomes current even if the clock stepped backwards. Two
    /// sessions in the same second collapse into one closed row.
    pub fn record_new_session(conn: &Connection, at: DateTime<Utc>) -> Result<()> {
        conn.execute(
            "INSERT INTO queue_sessions (timestamp, open)
             VALUES (MAX(?1, COALESCE((SELECT MAX(timestamp) FROM queue_sessions), ?1)), 0)
             ON CONFLICT(timestamp) DO UPDATE SET open = 0",
            [at.timestamp()],
        )
        .map_err(from_rusqlite)?;
        tracing::debug!(timestamp = at.timestamp(), "session recorded");
        Ok(())
    }

    /// Set the open flag on the latest session
    ///
    /// Fails with `SessionMissing` when the log is empty.
    pub fn set_queue_open(conn: &Connection, open: bool) -> Result<()> {
        let updated = conn
            .execute(
                "UPDATE queue_sessions SET open = ?1
                 WHERE timestamp = (SELECT MAX(timestamp) FROM queue_sessions)",
                [open],
            )
            .map_err(from_rusqlite)?;
        if updated == 0 {
            return Err(session_missing("set_queue_open"));
        }
        tracing::debug!(open, "queue status persisted");
        Ok(())
    }

    /// Open flag of the latest session
    ///
    /// Fails with `SessionMissing` when the log is empty.
    pub fn is_queue_open(conn: &Connection) -> Result<bool> {
        conn.query_row(
            "SELECT open FROM queue_sessions ORDER BY timestamp DESC LIMIT 1",
            [],
            |row| row.get::<_, bool>(0),
        )
        .optional()
        .map_err(from_rusqlite)?
        .ok_or_else(|| session_missing("is_queue_open"))
    }

    pub fn queue_status(conn: &Connection) -> Result<QueueStatus> {
        Ok(QueueStatus::from_open(Self::is_queue_open(conn)?))
    }

    /// Number of rows in the session log
    pub fn session_count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM queue_sessions", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}
