//! sdrmm engine - queue mutation coordinator
//!
//! Translates each `Command` into calls against the remote queue and the
//! local state store, running the admission filter where a command needs it.

pub mod commands;
pub mod outcome;

pub use commands::engine_command::{apply_engine_command, EngineContext};
pub use outcome::{EngineCommandResult, QueueSummary};
