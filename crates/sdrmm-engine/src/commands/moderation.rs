//! Bans and refunds

#![allow(clippy::result_large_err)]

use std::time::Instant;

use sdrmm_core::errors::Result;
use sdrmm_core::{log_op_start, UserCounters};
use sdrmm_store::StateRepo;

use super::engine_command::EngineContext;
use super::finish;
use crate::outcome::EngineCommandResult;

/// Decrement each enabled counter by one
///
/// Counters only move while their limit is configured, mirroring `add`.
/// There is no floor: refunding a user with nothing spent goes negative.
pub(crate) fn refund_counters(ctx: &EngineContext<'_>, username: &str) -> Result<UserCounters> {
    let mut counters = StateRepo::get_counters(ctx.conn, username)?;

    if ctx.limits.tracks_requests() {
        counters.successful_requests -= 1;
        StateRepo::set_user_requests(ctx.conn, username, counters.successful_requests)?;
    }
    if ctx.limits.tracks_queue() {
        counters.requests_in_queue -= 1;
        StateRepo::set_user_requests_in_queue(ctx.conn, username, counters.requests_in_queue)?;
    }

    if counters.successful_requests < 0 || counters.requests_in_queue < 0 {
        tracing::warn!(
            username,
            successful_requests = counters.successful_requests,
            requests_in_queue = counters.requests_in_queue,
            "refund left a negative counter"
        );
    }
    Ok(counters)
}

/// Ban a map; refunds `username` when given
pub fn ban(
    ctx: &EngineContext<'_>,
    id: &str,
    username: Option<&str>,
) -> Result<EngineCommandResult> {
    log_op_start!("ban", map_id = id, username = username.unwrap_or_default());
    let start = Instant::now();
    finish("ban", start, ban_impl(ctx, id, username))
}

fn ban_impl(
    ctx: &EngineContext<'_>,
    id: &str,
    username: Option<&str>,
) -> Result<EngineCommandResult> {
    let candidate = ctx.remote.fetch_candidate(id)?;
    StateRepo::ban_map(ctx.conn, &candidate.id, &candidate.hash)?;

    if let Some(user) = username {
        refund_counters(ctx, user)?;
    }

    Ok(EngineCommandResult::Banned {
        id: candidate.id,
        refunded: username.map(str::to_string),
    })
}

pub fn unban(ctx: &EngineContext<'_>, id: &str) -> Result<EngineCommandResult> {
    log_op_start!("unban", map_id = id);
    let start = Instant::now();
    finish("unban", start, unban_impl(ctx, id))
}

fn unban_impl(ctx: &EngineContext<'_>, id: &str) -> Result<EngineCommandResult> {
    let candidate = ctx.remote.fetch_candidate(id)?;
    StateRepo::unban_map(ctx.conn, &candidate.id)?;
    Ok(EngineCommandResult::Unbanned { id: candidate.id })
}

/// Give back the quota of one request without touching the remote queue
pub fn refund(ctx: &EngineContext<'_>, username: &str) -> Result<EngineCommandResult> {
    log_op_start!("refund", username = username);
    let start = Instant::now();
    let result = refund_counters(ctx, username).map(|counters| EngineCommandResult::Refunded {
        username: username.to_string(),
        counters,
    });
    finish("refund", start, result)
}
