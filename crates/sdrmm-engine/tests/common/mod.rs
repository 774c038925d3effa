#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use rusqlite::Connection;

use sdrmm_core::{Candidate, Difficulty, InMemoryQueue, Limits, QueueEntry};
use sdrmm_engine::EngineContext;

pub fn map(id: &str, duration_secs: u32) -> Candidate {
    Candidate {
        id: id.to_string(),
        hash: format!("hash-{}", id),
        title: format!("Song {}", id),
        uploader: "mapper".to_string(),
        duration_secs,
        uploaded_at: Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap(),
        difficulties: vec![Difficulty::new("Expert", "Standard", 18.0, 6.0)],
    }
}

pub fn entry(id: &str, requester: &str) -> QueueEntry {
    QueueEntry::new(map(id, 120), Some(requester.to_string()))
}

pub fn setup_db() -> Connection {
    sdrmm_store::db::initialize_in_memory().unwrap()
}

pub fn open_db() -> Connection {
    let conn = setup_db();
    sdrmm_store::StateRepo::set_queue_open(&conn, true).unwrap();
    conn
}

pub fn ctx<'a>(conn: &'a Connection, remote: &'a InMemoryQueue, limits: &'a Limits) -> EngineContext<'a> {
    EngineContext::new(conn, remote, limits)
        .with_now(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}
