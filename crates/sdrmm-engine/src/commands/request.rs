//! Request intake: `add` and `wip`

#![allow(clippy::result_large_err)]

use std::time::Instant;

use sdrmm_core::errors::Result;
use sdrmm_core::{evaluate, log_op_start, AdmissionInput, Verdict};
use sdrmm_store::StateRepo;

use super::engine_command::EngineContext;
use super::finish;
use crate::outcome::EngineCommandResult;

/// Request a map for `username`
///
/// The candidate goes through the admission filter unless `modadd` is set.
/// On acceptance the map is queued remotely, then each enabled counter is
/// incremented. A rejection leaves every system untouched.
///
/// # Errors
///
/// - `ExternalService` / `Serialization`: fetch or enqueue failed
/// - `Persistence`, `SessionMissing`: store failure
pub fn add(
    ctx: &EngineContext<'_>,
    id: &str,
    username: &str,
    modadd: bool,
) -> Result<EngineCommandResult> {
    log_op_start!("add", map_id = id, username = username, modadd = modadd);
    let start = Instant::now();
    finish("add", start, add_impl(ctx, id, username, modadd))
}

fn add_impl(
    ctx: &EngineContext<'_>,
    id: &str,
    username: &str,
    modadd: bool,
) -> Result<EngineCommandResult> {
    let candidate = ctx.remote.fetch_candidate(id)?;
    let counters = StateRepo::get_counters(ctx.conn, username)?;
    let queue_open = StateRepo::is_queue_open(ctx.conn)?;
    let banned = StateRepo::is_banned(ctx.conn, &candidate.id)?;

    let verdict = evaluate(&AdmissionInput {
        candidate: &candidate,
        counters,
        queue_open,
        banned,
        limits: ctx.limits,
        override_flag: modadd,
        now: ctx.now,
    });

    if let Verdict::Reject(rejection) = verdict {
        tracing::info!(
            op = "add",
            map_id = %candidate.id,
            rejection_code = rejection.code(),
            "request rejected"
        );
        return Ok(EngineCommandResult::Rejected(rejection));
    }

    ctx.remote.enqueue(&candidate.id, Some(username))?;

    let mut remaining = None;
    if ctx.limits.tracks_requests() {
        let successful = counters.successful_requests + 1;
        StateRepo::set_user_requests(ctx.conn, username, successful)?;
        remaining = Some(ctx.limits.request_limit - successful);
    }
    if ctx.limits.tracks_queue() {
        StateRepo::set_user_requests_in_queue(ctx.conn, username, counters.requests_in_queue + 1)?;
    }

    Ok(EngineCommandResult::Added {
        id: candidate.id,
        title: candidate.title,
        remaining,
    })
}

/// Queue a work-in-progress map; no admission rules apply
///
/// # Errors
///
/// `ExternalService` when the service refuses the upload.
pub fn wip(ctx: &EngineContext<'_>, id: &str, username: &str) -> Result<EngineCommandResult> {
    log_op_start!("wip", map_id = id, username = username);
    let start = Instant::now();
    let result = ctx
        .remote
        .add_wip(id, username)
        .map(|()| EngineCommandResult::WipAdded { id: id.to_string() });
    finish("wip", start, result)
}
