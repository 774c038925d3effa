//! Admission rule chain
//!
//! Decides whether a candidate may enter the queue. Rules run in a fixed order
//! and stop at the first failure:
//!
//! 1. queue open
//! 2. not banned
//! 3. uploaded on or after the cutoff date
//! 4. old enough
//! 5. duration within bounds
//! 6. some difficulty within the NJS range, some difficulty within the NPS range
//! 7. session request quota not reached
//! 8. in-queue quota not reached
//!
//! A moderator override skips the whole chain. Evaluation is a pure function of
//! `AdmissionInput`; the caller gathers the ban flag, counters and queue state.

mod rejection;
pub mod rules;

pub use rejection::Rejection;

use chrono::{DateTime, Utc};

use crate::config::Limits;
use crate::model::{Candidate, UserCounters};

/// Everything the rule chain looks at
#[derive(Debug, Clone)]
pub struct AdmissionInput<'a> {
    pub candidate: &'a Candidate,
    pub counters: UserCounters,
    pub queue_open: bool,
    /// Whether the candidate's identifier is on the ban list
    pub banned: bool,
    pub limits: &'a Limits,
    /// Moderator force-add
    pub override_flag: bool,
    /// Reference time for the map age check
    pub now: DateTime<Utc>,
}

/// Outcome of the rule chain
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Accept => None,
            Verdict::Reject(r) => Some(r),
        }
    }
}

/// Run the rule chain over `input`
pub fn evaluate(input: &AdmissionInput<'_>) -> Verdict {
    if input.override_flag {
        return Verdict::Accept;
    }

    match run_chain(input) {
        Ok(()) => Verdict::Accept,
        Err(rejection) => Verdict::Reject(rejection),
    }
}

fn run_chain(input: &AdmissionInput<'_>) -> Result<(), Rejection> {
    let candidate = input.candidate;
    let limits = input.limits;

    rules::check_queue_open(input.queue_open)?;
    rules::check_not_banned(&candidate.id, input.banned)?;
    rules::check_cutoff_date(candidate.uploaded_at, limits.newer_than)?;
    rules::check_map_age(candidate.uploaded_at, input.now, limits.min_map_age_days)?;
    rules::check_duration(candidate.duration_secs, limits.min_duration, limits.max_duration)?;
    rules::check_difficulty_ranges(&candidate.difficulties, limits)?;
    rules::check_request_limit(input.counters.successful_requests, limits.request_limit)?;
    rules::check_queue_limit(input.counters.requests_in_queue, limits.queue_request_limit)?;

    Ok(())
}
