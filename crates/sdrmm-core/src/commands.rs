//! Command inventory
//!
//! Every operation the coordinator understands, each arm carrying its own
//! typed payload. `Command::from_args` converts the loosely typed surface used
//! by chat-bot integrations (a command name plus string arguments) and rejects
//! bad input before anything is touched.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::{invalid_argument, missing_argument, ExError, ExErrorKind, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Request a map on behalf of a viewer
    Add {
        id: String,
        username: String,
        /// Moderator force-add, bypasses every admission rule
        modadd: bool,
    },

    /// Move a user's most recent request to the top of the queue
    MoveToTop { username: String },

    /// Queue a work-in-progress map, no admission rules apply
    Wip { id: String, username: String },

    /// Summarize the queue, optionally with a user's positions
    GetQueue { username: Option<String> },

    /// Ban a map, refunding the user whose request prompted it
    Ban { id: String, username: Option<String> },

    Unban { id: String },

    /// Report whether the queue is open
    QueueStatus,

    /// Open or close the queue; flips the current state when `status` is absent
    ToggleQueue { status: Option<bool> },

    /// Undo a user's most recent request
    Oops { username: String },

    /// Give back the quota spent on a request without touching the queue
    Refund { username: String },

    /// Start a new session: empty queue, zeroed counters, queue closed
    NewSession,

    /// Empty the queue and zero counters, optionally saving the queue first
    Clear { save_to: Option<PathBuf> },
}

impl Command {
    /// The command's name on the argument-map surface
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::MoveToTop { .. } => "mtt",
            Command::Wip { .. } => "wip",
            Command::GetQueue { .. } => "getqueue",
            Command::Ban { .. } => "ban",
            Command::Unban { .. } => "unban",
            Command::QueueStatus => "queuestatus",
            Command::ToggleQueue { .. } => "togglequeue",
            Command::Oops { .. } => "oops",
            Command::Refund { .. } => "refund",
            Command::NewSession => "new",
            Command::Clear { .. } => "clear",
        }
    }

    /// Build a command from its name and a string-keyed argument map
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an unknown command, a missing required argument, or
    /// a boolean argument that does not parse.
    #[allow(clippy::result_large_err)]
    pub fn from_args(name: &str, args: &HashMap<String, String>) -> Result<Command> {
        let command = match name {
            "add" => Command::Add {
                id: required(name, args, "id")?,
                username: required(name, args, "username")?,
                modadd: optional_bool(name, args, "modadd")?.unwrap_or(false),
            },
            "mtt" => Command::MoveToTop {
                username: required(name, args, "username")?,
            },
            "wip" => Command::Wip {
                id: required(name, args, "id")?,
                username: required(name, args, "username")?,
            },
            "getqueue" => Command::GetQueue {
                username: optional(args, "username"),
            },
            "ban" => Command::Ban {
                id: required(name, args, "id")?,
                username: optional(args, "username"),
            },
            "unban" => Command::Unban {
                id: required(name, args, "id")?,
            },
            "queuestatus" => Command::QueueStatus,
            "togglequeue" => Command::ToggleQueue {
                status: optional_bool(name, args, "status")?,
            },
            "oops" => Command::Oops {
                username: required(name, args, "username")?,
            },
            "refund" => Command::Refund {
                username: required(name, args, "username")?,
            },
            "new" => Command::NewSession,
            "clear" => Command::Clear {
                save_to: optional(args, "save").map(PathBuf::from),
            },
            other => {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op("parse_command")
                    .with_message(format!("unknown command '{}'", other)))
            }
        };
        Ok(command)
    }
}

/// Present and non-empty
fn optional(args: &HashMap<String, String>, key: &str) -> Option<String> {
    args.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[allow(clippy::result_large_err)]
fn required(command: &str, args: &HashMap<String, String>, key: &str) -> Result<String> {
    optional(args, key).ok_or_else(|| missing_argument(command, key))
}

#[allow(clippy::result_large_err)]
fn optional_bool(
    command: &str,
    args: &HashMap<String, String>,
    key: &str,
) -> Result<Option<bool>> {
    match optional(args, key) {
        None => Ok(None),
        Some(raw) => parse_bool(&raw)
            .map(Some)
            .ok_or_else(|| invalid_argument(command, key, &raw)),
    }
}

/// Accepts the spellings chat-bot tools commonly emit
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
