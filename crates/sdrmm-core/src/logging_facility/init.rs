//! Logging initialization

use std::str::FromStr;
use std::sync::Once;

use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

use crate::errors::{ExError, ExErrorKind};

/// Logging profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output at debug level
    Development,
    /// JSON lines at info level
    Production,
    /// Bare registry; tests attach their own capture layer
    Test,
}

impl FromStr for Profile {
    type Err = ExError;

    /// Accepts the `logging.format` values: `human` or `json`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "pretty" | "development" => Ok(Profile::Development),
            "json" | "production" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(ExError::new(ExErrorKind::Config)
                .with_op("logging_init")
                .with_message(format!("unknown log format '{}'", other))),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber
///
/// Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
/// overrides the profile's default filter. Later calls are no-ops.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("sdrmm=debug")),
                )
                .finish()
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("sdrmm=info")),
                )
                .finish()
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}
