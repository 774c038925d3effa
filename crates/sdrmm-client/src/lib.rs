//! sdrmm client - HTTP implementation of `RemoteQueue`
//!
//! Talks to the in-game request manager's local web API. Every call blocks
//! without a timeout and is made exactly once.

pub mod client;
pub mod errors;
pub mod schema;

pub use client::DrmClient;
