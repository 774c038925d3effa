pub mod candidate;
pub mod counters;
pub mod session;

pub use candidate::{Candidate, Difficulty, QueueEntry};
pub use counters::UserCounters;
pub use session::QueueStatus;
