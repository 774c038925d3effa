//! Wire format of the request manager API
//!
//! Only the fields the coordinator reads are declared; everything else in the
//! payload is ignored.

use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::Deserialize;

use sdrmm_core::model::{Candidate, Difficulty, QueueEntry};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireDiff {
    pub difficulty: String,
    pub characteristic: String,
    pub note_jump_speed: f64,
    pub notes_per_second: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireMap {
    pub bsr_key: String,
    #[serde(default)]
    pub hash: String,
    pub user: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub mapper: String,
    pub duration: u32,
    #[serde(with = "ts_seconds")]
    pub upload_time: DateTime<Utc>,
    #[serde(default)]
    pub diffs: Vec<WireDiff>,
}

/// One row of `queue/where/{user}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireSpot {
    pub spot: usize,
    pub queue_item: WireMap,
}

/// Body of the queue control endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub message: String,
}

impl From<WireDiff> for Difficulty {
    fn from(d: WireDiff) -> Self {
        Difficulty::new(d.difficulty, d.characteristic, d.note_jump_speed, d.notes_per_second)
    }
}

impl From<WireMap> for Candidate {
    fn from(m: WireMap) -> Self {
        Candidate {
            id: m.bsr_key,
            hash: m.hash,
            title: m.title,
            uploader: m.mapper,
            duration_secs: m.duration,
            uploaded_at: m.upload_time,
            difficulties: m.diffs.into_iter().map(Difficulty::from).collect(),
        }
    }
}

impl From<WireMap> for QueueEntry {
    fn from(mut m: WireMap) -> Self {
        let requester = m.user.take();
        QueueEntry::new(Candidate::from(m), requester)
    }
}
