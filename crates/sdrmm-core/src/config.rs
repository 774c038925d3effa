//! Admission limits
//!
//! `Limits` is an immutable value handed to the filter and the coordinator at
//! construction time. For every numeric axis, `0` means the check is disabled.
//! The upload cutoff is disabled with `newer_than = "none"` (or an empty
//! string); leaving the key out keeps the default date.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Numeric thresholds applied to incoming requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Shortest accepted song, in seconds
    pub min_duration: u32,

    /// Longest accepted song, in seconds
    pub max_duration: u32,

    pub min_njs: f64,
    pub max_njs: f64,

    pub min_nps: f64,
    pub max_nps: f64,

    /// Accepted requests per user per session
    pub request_limit: i64,

    /// Requests a single user may have waiting in the queue at once
    pub queue_request_limit: i64,

    /// Maps uploaded before this date are refused
    #[serde(deserialize_with = "deserialize_cutoff")]
    pub newer_than: Option<NaiveDate>,

    /// Maps younger than this many days are refused
    pub min_map_age_days: u32,
}

/// Earliest upload date accepted when nothing else is configured
pub fn default_newer_than() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2018, 5, 8)
}

/// `YYYY-MM-DD`, or `none` / empty for no cutoff
fn deserialize_cutoff<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("none") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| {
                serde::de::Error::custom(format!("invalid newer_than '{}': {}", value, e))
            }),
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_duration: 0,
            max_duration: 0,
            min_njs: 0.0,
            max_njs: 0.0,
            min_nps: 0.0,
            max_nps: 0.0,
            request_limit: 0,
            queue_request_limit: 0,
            newer_than: default_newer_than(),
            min_map_age_days: 0,
        }
    }
}

impl Limits {
    /// Limits with every check disabled
    pub fn unrestricted() -> Self {
        Self {
            newer_than: None,
            ..Self::default()
        }
    }

    /// Whether the per-session request quota is enforced
    pub fn tracks_requests(&self) -> bool {
        self.request_limit > 0
    }

    /// Whether the in-queue quota is enforced
    pub fn tracks_queue(&self) -> bool {
        self.queue_request_limit > 0
    }
}
