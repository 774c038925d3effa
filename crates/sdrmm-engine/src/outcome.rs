//! Typed results of coordinator commands and their chat-facing messages

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use sdrmm_core::format::{format_duration, join_with_and};
use sdrmm_core::{QueueEntry, QueueStatus, Rejection, UserCounters};

/// What `getqueue` reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSummary {
    pub total: usize,
    /// Summed song length of every queued map
    pub total_duration_secs: u64,
    /// The asking user's positions, ascending; `None` when no user was given
    pub positions: Option<Vec<usize>>,
}

/// Result of applying a command
///
/// A rejection is a normal result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommandResult {
    Added {
        id: String,
        title: String,
        /// Requests left this session, when a request limit is configured
        remaining: Option<i64>,
    },
    Rejected(Rejection),
    MovedToTop {
        from: usize,
    },
    WipAdded {
        id: String,
    },
    Queue(QueueSummary),
    Banned {
        id: String,
        refunded: Option<String>,
    },
    Unbanned {
        id: String,
    },
    Status(QueueStatus),
    Toggled(QueueStatus),
    Removed {
        entry: QueueEntry,
    },
    Refunded {
        username: String,
        counters: UserCounters,
    },
    SessionStarted,
    Cleared {
        /// Where the snapshot was saved and how many entries it held
        saved: Option<(PathBuf, usize)>,
    },
}

impl EngineCommandResult {
    pub fn is_rejection(&self) -> bool {
        matches!(self, EngineCommandResult::Rejected(_))
    }
}

impl fmt::Display for QueueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(f, "Queue is empty!");
        }

        write!(
            f,
            "There are {} maps in queue! ({} total)",
            self.total,
            format_duration(self.total_duration_secs)
        )?;

        match self.positions.as_deref() {
            None => Ok(()),
            Some([]) => write!(f, " You have no maps in queue."),
            Some([only]) => write!(f, " Your map is in position {}.", only),
            Some(many) => write!(f, " Your maps are in positions {}.", join_with_and(many)),
        }
    }
}

impl fmt::Display for EngineCommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCommandResult::Added {
                id,
                title,
                remaining,
            } => {
                if title.is_empty() {
                    write!(f, "Added {} to queue!", id)?;
                } else {
                    write!(f, "Added {} ({}) to queue!", title, id)?;
                }
                if let Some(left) = remaining {
                    write!(f, " You have {} requests left.", left)?;
                }
                Ok(())
            }
            EngineCommandResult::Rejected(rejection) => write!(f, "{}", rejection),
            EngineCommandResult::MovedToTop { .. } => {
                write!(f, "Moved request to the top of the queue.")
            }
            EngineCommandResult::WipAdded { id } => write!(f, "Added WIP {}.", id),
            EngineCommandResult::Queue(summary) => write!(f, "{}", summary),
            EngineCommandResult::Banned { id, .. } => {
                write!(f, "{} is now banned from being requested.", id)
            }
            EngineCommandResult::Unbanned { id } => write!(f, "{} can now be requested again.", id),
            EngineCommandResult::Status(status) => write!(f, "The queue is currently {}.", status),
            EngineCommandResult::Toggled(status) => write!(f, "The queue is now {}.", status),
            EngineCommandResult::Removed { entry } => {
                write!(f, "Request {} removed from queue.", entry.map.id)
            }
            EngineCommandResult::Refunded { .. } => write!(f, "Request refunded."),
            EngineCommandResult::SessionStarted => {
                write!(f, "New session created! Queue has been cleared and closed.")
            }
            EngineCommandResult::Cleared { saved } => {
                write!(f, "Queue cleared!")?;
                if let Some((path, count)) = saved {
                    write!(f, " Saved {} maps to {}.", count, path.display())?;
                }
                Ok(())
            }
        }
    }
}
