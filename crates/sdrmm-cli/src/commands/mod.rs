//! Subcommand arguments and their mapping onto `Command`

use std::path::PathBuf;

use clap::{Args, Subcommand};

use sdrmm_core::commands::parse_bool;
use sdrmm_core::errors::Result;
use sdrmm_core::Command;

pub mod invoke;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Request a map for a viewer
    Add(AddArgs),
    /// Move a viewer's latest request to the top of the queue
    Mtt(UserArg),
    /// Queue a work-in-progress map
    Wip(WipArgs),
    /// Summarize the queue
    Getqueue(OptionalUserArg),
    /// Ban a map, refunding the viewer who requested it
    Ban(BanArgs),
    /// Lift a ban
    Unban(IdArg),
    /// Show whether the queue is open
    Queuestatus,
    /// Open or close the queue
    Togglequeue(ToggleArgs),
    /// Remove a viewer's latest request
    Oops(UserArg),
    /// Give a viewer back one request
    Refund(UserArg),
    /// Start a new session
    New,
    /// Clear the queue and all counters
    Clear(ClearArgs),
    /// Run a command from its name and key=value arguments
    Invoke(invoke::InvokeArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub id: String,
    #[arg(long)]
    pub user: String,
    /// Skip every admission rule
    #[arg(long)]
    pub modadd: bool,
}

#[derive(Debug, Args)]
pub struct WipArgs {
    /// WIP code or URL
    pub id: String,
    #[arg(long)]
    pub user: String,
}

#[derive(Debug, Args)]
pub struct BanArgs {
    pub id: String,
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Debug, Args)]
pub struct IdArg {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct UserArg {
    pub user: String,
}

#[derive(Debug, Args)]
pub struct OptionalUserArg {
    pub user: Option<String>,
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    /// Explicit state; flips the current one when omitted
    #[arg(long, value_parser = parse_status)]
    pub status: Option<bool>,
}

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Write the queue to this JSON file before clearing
    #[arg(long)]
    pub save: Option<PathBuf>,
}

fn parse_status(raw: &str) -> std::result::Result<bool, String> {
    match raw {
        "open" => Ok(true),
        "closed" | "close" => Ok(false),
        other => parse_bool(other).ok_or_else(|| format!("'{}' is not a queue status", other)),
    }
}

impl Commands {
    /// The coordinator command this subcommand stands for
    #[allow(clippy::result_large_err)]
    pub fn into_command(self) -> Result<Command> {
        let command = match self {
            Commands::Add(a) => Command::Add {
                id: a.id,
                username: a.user,
                modadd: a.modadd,
            },
            Commands::Mtt(a) => Command::MoveToTop { username: a.user },
            Commands::Wip(a) => Command::Wip {
                id: a.id,
                username: a.user,
            },
            Commands::Getqueue(a) => Command::GetQueue { username: a.user },
            Commands::Ban(a) => Command::Ban {
                id: a.id,
                username: a.user,
            },
            Commands::Unban(a) => Command::Unban { id: a.id },
            Commands::Queuestatus => Command::QueueStatus,
            Commands::Togglequeue(a) => Command::ToggleQueue { status: a.status },
            Commands::Oops(a) => Command::Oops { username: a.user },
            Commands::Refund(a) => Command::Refund { username: a.user },
            Commands::New => Command::NewSession,
            Commands::Clear(a) => Command::Clear { save_to: a.save },
            Commands::Invoke(a) => return a.into_command(),
        };
        Ok(command)
    }
}
