//! Layered configuration
//!
//! Built-in defaults, then the TOML file, then `SDRMM__SECTION__KEY`
//! environment variables. A missing file is created from the defaults.

#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use sdrmm_core::errors::{ExError, ExErrorKind, Result};
use sdrmm_core::Limits;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrmConfig {
    /// Scheme and host of the request manager
    pub url: String,
    pub port: u16,
}

impl Default for DrmConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost".to_string(),
            port: 13337,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("database.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `development` or `production`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "development".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub drm: DrmConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub limits: Limits,
}

fn config_error(err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_settings")
        .with_message(err.to_string())
}

impl Settings {
    /// Load settings from `path`, writing the defaults there first if absent
    ///
    /// # Errors
    ///
    /// `Io` if the default file cannot be written, `Config` if any layer
    /// fails to parse or a value has the wrong type.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::write_defaults(path)?;
        }

        let defaults = toml::to_string(&Settings::default()).map_err(config_error)?;
        Config::builder()
            .add_source(File::from_str(&defaults, FileFormat::Toml))
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml))
            .add_source(
                Environment::with_prefix("SDRMM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .map_err(config_error)
    }

    fn write_defaults(path: &Path) -> Result<()> {
        let rendered = toml::to_string_pretty(&Settings::default()).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("write_default_settings")
                .with_message(e.to_string())
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, rendered)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings, Settings::default());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[drm]"));
        assert!(written.contains("13337"));
        assert!(written.contains("2018-05-08"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[drm]\nport = 9000\n\n[limits]\nrequest_limit = 2\nmax_duration = 600\n",
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.drm.port, 9000);
        assert_eq!(settings.drm.url, "http://localhost");
        assert_eq!(settings.limits.request_limit, 2);
        assert_eq!(settings.limits.max_duration, 600);
        assert_eq!(settings.limits.newer_than, Limits::default().newer_than);
    }

    #[test]
    fn test_cutoff_date_disabled_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[limits]\nrequest_limit = 2\nnewer_than = \"none\"\n",
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.limits.request_limit, 2);
        assert_eq!(settings.limits.newer_than, None);
    }

    #[test]
    fn test_cutoff_date_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[limits]\nnewer_than = \"2021-03-04\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(
            settings.limits.newer_than.map(|d| d.to_string()),
            Some("2021-03-04".to_string())
        );
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[drm]\nport = \"not a port\"\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
    }
}
