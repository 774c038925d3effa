//! sdrmm store - local persistence for bans, per-user counters and the
//! queue session log
//!
//! Provides:
//! - SQLite connection helpers (`db`)
//! - Embedded, checksummed schema migrations
//! - `StateRepo`, the point-query repository the coordinator drives

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use repo::StateRepo;
