use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One playable difficulty of a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Difficulty name (Easy, Normal, Hard, Expert, ExpertPlus)
    pub name: String,

    /// Characteristic the difficulty belongs to (Standard, OneSaber, ...)
    pub characteristic: String,

    /// Note jump speed
    pub njs: f64,

    /// Notes per second
    pub nps: f64,
}

impl Difficulty {
    pub fn new(
        name: impl Into<String>,
        characteristic: impl Into<String>,
        njs: f64,
        nps: f64,
    ) -> Self {
        Self {
            name: name.into(),
            characteristic: characteristic.into(),
            njs,
            nps,
        }
    }
}

/// Snapshot of a requestable map as reported by the remote queue service
///
/// Candidates are fetched per request and never persisted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Map identifier (the "bsr" key)
    pub id: String,

    /// Content hash of the map archive
    pub hash: String,

    /// Song title, used in confirmation messages
    #[serde(default)]
    pub title: String,

    /// Name of the uploader
    pub uploader: String,

    /// Song duration in seconds
    pub duration_secs: u32,

    /// Upload time, serialized as seconds since the epoch
    #[serde(with = "ts_seconds")]
    pub uploaded_at: DateTime<Utc>,

    /// Difficulties in the order the service lists them
    pub difficulties: Vec<Difficulty>,
}

/// One slot of the remote queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub map: Candidate,

    /// Who requested it; entries added from the game itself have none
    pub requester: Option<String>,
}

impl QueueEntry {
    pub fn new(map: Candidate, requester: Option<String>) -> Self {
        Self { map, requester }
    }

    /// Whether this entry was requested by `username`
    pub fn is_requested_by(&self, username: &str) -> bool {
        self.requester.as_deref() == Some(username)
    }
}
