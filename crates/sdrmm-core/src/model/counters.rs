use serde::{Deserialize, Serialize};

/// Per-user request counters for the current session
///
/// Both counters are plain signed integers: a refund may take them below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounters {
    /// Requests accepted this session
    pub successful_requests: i64,

    /// Requests currently sitting in the queue
    pub requests_in_queue: i64,
}

impl UserCounters {
    pub fn new(successful_requests: i64, requests_in_queue: i64) -> Self {
        Self {
            successful_requests,
            requests_in_queue,
        }
    }
}
