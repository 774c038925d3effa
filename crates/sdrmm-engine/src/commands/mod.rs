//! Command handlers
//!
//! ## Logging Ownership
//!
//! Each public handler owns the lifecycle events of its operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success (rejections included)
//! - `log_op_error!` on failure
//!
//! The store and the HTTP client log only at `debug!`.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use sdrmm_core::errors::Result;
use sdrmm_core::{log_op_end, log_op_error};

pub mod engine_command;
pub mod moderation;
pub mod queue;
pub mod request;
pub mod session;

/// Emit the end or error event for `op` and hand the result back
pub(crate) fn finish<T>(op: &'static str, start: Instant, result: Result<T>) -> Result<T> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms);
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = duration_ms);
        }
    }
    result
}
