//! sdrmm core - request admission and queue domain kernel
//!
//! This crate provides the pure, I/O-free parts of the request manager:
//! - Candidate / queue entry models and per-user counters
//! - Immutable admission `Limits`
//! - The `Command` inventory, strongly typed per command
//! - The admission rule chain (`admission::evaluate`)
//! - The `RemoteQueue` capability trait, plus an in-memory implementation
//!   behind the `test-support` feature
//! - The structured error facility and logging facility

pub mod admission;
pub mod commands;
pub mod config;
pub mod errors;
pub mod format;
pub mod logging_facility;
pub mod model;
pub mod remote;

// Re-export commonly used types
pub use admission::{evaluate, AdmissionInput, Rejection, Verdict};
pub use commands::Command;
pub use config::Limits;
pub use errors::{ExError, ExErrorKind, Result};
pub use model::{Candidate, Difficulty, QueueEntry, QueueStatus, UserCounters};
pub use remote::RemoteQueue;
#[cfg(any(test, feature = "test-support"))]
pub use remote::{InMemoryQueue, RemoteCall, RemoteOp};
