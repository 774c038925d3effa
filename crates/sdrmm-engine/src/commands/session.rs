//! Queue status and session lifecycle

#![allow(clippy::result_large_err)]

use std::time::Instant;

use sdrmm_core::errors::Result;
use sdrmm_core::{log_op_start, QueueStatus};
use sdrmm_store::StateRepo;

use super::engine_command::EngineContext;
use super::finish;
use crate::outcome::EngineCommandResult;

pub fn queue_status(ctx: &EngineContext<'_>) -> Result<EngineCommandResult> {
    log_op_start!("queuestatus");
    let start = Instant::now();
    let result = StateRepo::queue_status(ctx.conn).map(EngineCommandResult::Status);
    finish("queuestatus", start, result)
}

/// Set the queue to `status`, or flip it when no status is given
///
/// The new state is persisted locally first, then pushed to the remote queue.
pub fn toggle_queue(ctx: &EngineContext<'_>, status: Option<bool>) -> Result<EngineCommandResult> {
    log_op_start!("togglequeue", explicit = status.is_some());
    let start = Instant::now();
    finish("togglequeue", start, toggle_queue_impl(ctx, status))
}

fn toggle_queue_impl(
    ctx: &EngineContext<'_>,
    status: Option<bool>,
) -> Result<EngineCommandResult> {
    let current = StateRepo::queue_status(ctx.conn)?;
    let next: QueueStatus = current.toggled(status);

    StateRepo::set_queue_open(ctx.conn, next.is_open())?;
    ctx.remote.set_open(next.is_open())?;

    Ok(EngineCommandResult::Toggled(next))
}

/// Start a new session: clear the remote queue, zero all counters, close
/// the queue and append a closed session row
pub fn new_session(ctx: &EngineContext<'_>) -> Result<EngineCommandResult> {
    log_op_start!("new");
    let start = Instant::now();
    finish("new", start, new_session_impl(ctx))
}

fn new_session_impl(ctx: &EngineContext<'_>) -> Result<EngineCommandResult> {
    ctx.remote.clear()?;
    StateRepo::clear_all_counters(ctx.conn)?;
    ctx.remote.set_open(false)?;
    StateRepo::record_new_session(ctx.conn, ctx.now)?;
    Ok(EngineCommandResult::SessionStarted)
}
