//! Remote queue capability
//!
//! The queue itself lives in the game-side request manager. The coordinator
//! only sees this narrow interface, so it can run against the HTTP client in
//! production and against `InMemoryQueue` in tests (behind the
//! `test-support` feature).
//!
//! Positions are indexes into `snapshot()` order, exactly as the service
//! reports them from `positions_for_user`.

#[cfg(any(test, feature = "test-support"))]
mod memory;

#[cfg(any(test, feature = "test-support"))]
pub use memory::{InMemoryQueue, RemoteCall, RemoteOp};

use crate::errors::Result;
use crate::model::{Candidate, QueueEntry};

/// Operations the coordinator needs from the remote queue service
///
/// Every call blocks until the service answers.
#[allow(clippy::result_large_err)]
pub trait RemoteQueue {
    /// Look up map metadata by identifier
    fn fetch_candidate(&self, id: &str) -> Result<Candidate>;

    /// Append a map to the end of the queue
    fn enqueue(&self, id: &str, requester: Option<&str>) -> Result<()>;

    /// Move the entry at `from` to `to`
    fn move_position(&self, from: usize, to: usize) -> Result<()>;

    /// Remove every entry
    fn clear(&self) -> Result<()>;

    /// Positions of the user's entries, oldest first
    fn positions_for_user(&self, username: &str) -> Result<Vec<usize>>;

    /// The whole queue in play order
    fn snapshot(&self) -> Result<Vec<QueueEntry>>;

    /// Open or close the in-game queue
    fn set_open(&self, open: bool) -> Result<()>;

    /// Queue a work-in-progress map by code or URL
    fn add_wip(&self, id: &str, requester: &str) -> Result<()>;
}
