//! Single entry point from a parsed `Command` to its handler

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use sdrmm_core::errors::Result;
use sdrmm_core::{Command, Limits, RemoteQueue};

use crate::commands::{moderation, queue, request, session};
use crate::outcome::EngineCommandResult;

/// Collaborators every handler needs
///
/// `limits` is fixed for the lifetime of the context. `now` is the reference
/// time for the map age check and for new session rows.
#[derive(Clone, Copy)]
pub struct EngineContext<'a> {
    pub conn: &'a Connection,
    pub remote: &'a dyn RemoteQueue,
    pub limits: &'a Limits,
    pub now: DateTime<Utc>,
}

impl<'a> EngineContext<'a> {
    pub fn new(conn: &'a Connection, remote: &'a dyn RemoteQueue, limits: &'a Limits) -> Self {
        Self {
            conn,
            remote,
            limits,
            now: Utc::now(),
        }
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// Apply one command
///
/// # Errors
///
/// Store and remote failures propagate unchanged. Side effects applied before
/// the failure are not rolled back.
pub fn apply_engine_command(cmd: Command, ctx: &EngineContext<'_>) -> Result<EngineCommandResult> {
    match cmd {
        Command::Add {
            id,
            username,
            modadd,
        } => request::add(ctx, &id, &username, modadd),
        Command::Wip { id, username } => request::wip(ctx, &id, &username),
        Command::MoveToTop { username } => queue::move_to_top(ctx, &username),
        Command::GetQueue { username } => queue::get_queue(ctx, username.as_deref()),
        Command::Oops { username } => queue::oops(ctx, &username),
        Command::Clear { save_to } => queue::clear(ctx, save_to.as_deref()),
        Command::Ban { id, username } => moderation::ban(ctx, &id, username.as_deref()),
        Command::Unban { id } => moderation::unban(ctx, &id),
        Command::Refund { username } => moderation::refund(ctx, &username),
        Command::QueueStatus => session::queue_status(ctx),
        Command::ToggleQueue { status } => session::toggle_queue(ctx, status),
        Command::NewSession => session::new_session(ctx),
    }
}
