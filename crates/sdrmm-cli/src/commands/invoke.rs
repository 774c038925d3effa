//! `invoke <command> key=value...`, the argument-map surface used by
//! chat-bot integrations

#![allow(clippy::result_large_err)]

use std::collections::HashMap;

use clap::Args;

use sdrmm_core::errors::{ExError, ExErrorKind, Result};
use sdrmm_core::Command;

#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Command name, e.g. `add` or `togglequeue`
    pub command: String,

    /// Arguments as key=value pairs
    pub args: Vec<String>,
}

impl InvokeArgs {
    pub fn into_command(self) -> Result<Command> {
        let args = parse_pairs(&self.command, &self.args)?;
        Command::from_args(&self.command, &args)
    }
}

/// Split `key=value` pairs; later keys win
fn parse_pairs(command: &str, raw: &[String]) -> Result<HashMap<String, String>> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| {
                    ExError::new(ExErrorKind::InvalidInput)
                        .with_op(command.to_string())
                        .with_message(format!("expected key=value, got '{}'", pair))
                })
        })
        .collect()
}
