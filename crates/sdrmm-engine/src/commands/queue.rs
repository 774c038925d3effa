//! Queue-wide operations: move to top, summary, undo and clear

#![allow(clippy::result_large_err)]

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use sdrmm_core::errors::{no_requests_in_queue, ExError, ExErrorKind, Result};
use sdrmm_core::log_op_start;
use sdrmm_store::StateRepo;

use super::engine_command::EngineContext;
use super::finish;
use super::moderation::refund_counters;
use crate::outcome::{EngineCommandResult, QueueSummary};

/// Slot the request manager treats as the top of the queue
pub const TOP_POSITION: usize = 1;

/// Move the user's most recent request to the top
///
/// # Errors
///
/// `NoRequestsInQueue` if the user has nothing queued.
pub fn move_to_top(ctx: &EngineContext<'_>, username: &str) -> Result<EngineCommandResult> {
    log_op_start!("mtt", username = username);
    let start = Instant::now();
    finish("mtt", start, move_to_top_impl(ctx, username))
}

fn move_to_top_impl(ctx: &EngineContext<'_>, username: &str) -> Result<EngineCommandResult> {
    let positions = ctx.remote.positions_for_user(username)?;
    let last = *positions
        .last()
        .ok_or_else(|| no_requests_in_queue("mtt", username))?;

    ctx.remote.move_position(last, TOP_POSITION)?;
    Ok(EngineCommandResult::MovedToTop { from: last })
}

/// Summarize the queue, with the user's positions when a user is given
pub fn get_queue(ctx: &EngineContext<'_>, username: Option<&str>) -> Result<EngineCommandResult> {
    log_op_start!("getqueue", username = username.unwrap_or_default());
    let start = Instant::now();
    finish("getqueue", start, get_queue_impl(ctx, username))
}

fn get_queue_impl(ctx: &EngineContext<'_>, username: Option<&str>) -> Result<EngineCommandResult> {
    let snapshot = ctx.remote.snapshot()?;
    let positions = match username {
        Some(user) => {
            let mut positions = ctx.remote.positions_for_user(user)?;
            positions.sort_unstable();
            Some(positions)
        }
        None => None,
    };

    Ok(EngineCommandResult::Queue(QueueSummary {
        total: snapshot.len(),
        total_duration_secs: snapshot
            .iter()
            .map(|e| u64::from(e.map.duration_secs))
            .sum(),
        positions,
    }))
}

/// Remove the user's most recent request
///
/// The remote queue has no remove-at-position call, so the queue is cleared
/// and every other entry re-enqueued in its original order. Observers can see
/// the queue empty in between, and a failure part way through leaves it
/// partially rebuilt. A refund follows a complete rebuild.
///
/// # Errors
///
/// `NoRequestsInQueue` if the user has nothing queued.
pub fn oops(ctx: &EngineContext<'_>, username: &str) -> Result<EngineCommandResult> {
    log_op_start!("oops", username = username);
    let start = Instant::now();
    finish("oops", start, oops_impl(ctx, username))
}

fn oops_impl(ctx: &EngineContext<'_>, username: &str) -> Result<EngineCommandResult> {
    let mut snapshot = ctx.remote.snapshot()?;
    let positions = ctx.remote.positions_for_user(username)?;
    let target = *positions
        .last()
        .ok_or_else(|| no_requests_in_queue("oops", username))?;

    if target >= snapshot.len() {
        return Err(ExError::new(ExErrorKind::ExternalService)
            .with_op("oops")
            .with_username(username)
            .with_message(format!(
                "position {} is outside a queue of {} entries",
                target,
                snapshot.len()
            )));
    }
    let removed = snapshot.remove(target);

    ctx.remote.clear()?;
    for entry in &snapshot {
        ctx.remote.enqueue(&entry.map.id, entry.requester.as_deref())?;
    }
    tracing::debug!(
        removed = %removed.map.id,
        queue_len = snapshot.len(),
        "queue rebuilt"
    );

    refund_counters(ctx, username)?;
    Ok(EngineCommandResult::Removed { entry: removed })
}

/// Empty the queue and zero all counters, saving the queue first if asked
///
/// The session log is left alone, so the queue keeps its open/closed state.
pub fn clear(ctx: &EngineContext<'_>, save_to: Option<&Path>) -> Result<EngineCommandResult> {
    log_op_start!("clear", save = save_to.is_some());
    let start = Instant::now();
    finish("clear", start, clear_impl(ctx, save_to))
}

fn clear_impl(ctx: &EngineContext<'_>, save_to: Option<&Path>) -> Result<EngineCommandResult> {
    let saved = match save_to {
        Some(path) => {
            let snapshot = ctx.remote.snapshot()?;
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &snapshot)?;
            Some((path.to_path_buf(), snapshot.len()))
        }
        None => None,
    };

    ctx.remote.clear()?;
    StateRepo::clear_all_counters(ctx.conn)?;

    Ok(EngineCommandResult::Cleared { saved })
}
