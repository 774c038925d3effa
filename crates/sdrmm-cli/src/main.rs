//! sdrmm CLI
//!
//! Routes viewer map requests into the in-game request queue.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sdrmm_client::DrmClient;
use sdrmm_core::errors::Result;
use sdrmm_core::logging_facility::{init, Profile};
use sdrmm_core_types::RequestContext;
use sdrmm_engine::{apply_engine_command, EngineCommandResult, EngineContext};

mod commands;
mod settings;

use commands::Commands;
use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "sdrmm")]
#[command(about = "Song request manager for the in-game request queue", long_about = None)]
struct Cli {
    /// Configuration file; created with defaults if missing
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Database file, overrides `database.path`
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// `development` or `production`, overrides `logging.format`
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[allow(clippy::result_large_err)]
fn run(cli: Cli) -> Result<EngineCommandResult> {
    let settings = Settings::load(&cli.config)?;

    let format = cli.log_format.as_deref().unwrap_or(&settings.logging.format);
    init(format.parse::<Profile>()?);

    let command = cli.command.into_command()?;
    let context = RequestContext::new().with_command(command.name());
    let span = tracing::info_span!(
        "sdrmm",
        request_id = %context.request_id,
        command = command.name()
    );
    let _guard = span.enter();

    let db_path = cli.db.unwrap_or(settings.database.path);
    let conn = sdrmm_store::db::initialize(&db_path)?;
    let remote = DrmClient::new(&settings.drm.url, settings.drm.port)?;

    let ctx = EngineContext::new(&conn, &remote, &settings.limits);
    apply_engine_command(command, &ctx)
        .map_err(|e| e.with_request_id(context.request_id.clone()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(result) => {
            println!("{}", result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
