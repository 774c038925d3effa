use chrono::NaiveDate;
use thiserror::Error;

use crate::format::format_duration;

fn day(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn length(secs: &u32) -> String {
    format_duration(u64::from(*secs))
}

/// Why a candidate was refused entry to the queue
///
/// Rejections are expected outcomes. They are reported to the requester and
/// never abort the command.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("The queue is closed!")]
    QueueClosed,

    #[error("{id} is banned from being requested.")]
    Banned { id: String },

    #[error("Map is too old, was uploaded on {} (must be newer than {}).", day(.uploaded), day(.cutoff))]
    TooOld { uploaded: NaiveDate, cutoff: NaiveDate },

    #[error("Map is too new, was uploaded on {} (must be at least {min_age_days} days old).", day(.uploaded))]
    TooNew { uploaded: NaiveDate, min_age_days: u32 },

    #[error("Map is too short (length {}, minimum {}).", length(.duration_secs), length(.min_secs))]
    TooShort { duration_secs: u32, min_secs: u32 },

    #[error("Map is too long (length {}, maximum {}).", length(.duration_secs), length(.max_secs))]
    TooLong { duration_secs: u32, max_secs: u32 },

    #[error("Map does not have a difficulty between {min} and {max} NJS.")]
    OutOfNjsRange { min: f64, max: f64 },

    #[error("Map does not have a difficulty between {min} and {max} NPS.")]
    OutOfNpsRange { min: f64, max: f64 },

    #[error("You have no more requests this session! (max is {limit})")]
    UserRequestLimitReached { limit: i64 },

    #[error("You have too many songs in queue! (max is {limit})")]
    UserQueueLimitReached { limit: i64 },
}

impl Rejection {
    /// Stable code for logs and tests
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::QueueClosed => "REJ_QUEUE_CLOSED",
            Rejection::Banned { .. } => "REJ_BANNED",
            Rejection::TooOld { .. } => "REJ_TOO_OLD",
            Rejection::TooNew { .. } => "REJ_TOO_NEW",
            Rejection::TooShort { .. } => "REJ_TOO_SHORT",
            Rejection::TooLong { .. } => "REJ_TOO_LONG",
            Rejection::OutOfNjsRange { .. } => "REJ_OUT_OF_NJS_RANGE",
            Rejection::OutOfNpsRange { .. } => "REJ_OUT_OF_NPS_RANGE",
            Rejection::UserRequestLimitReached { .. } => "REJ_USER_REQUEST_LIMIT",
            Rejection::UserQueueLimitReached { .. } => "REJ_USER_QUEUE_LIMIT",
        }
    }
}
