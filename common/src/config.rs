//! Loading and normalization of the run configuration.
//!
//! The on-disk document is JSON with three optional fields. Every field is
//! parsed as an `Option` so an explicit `0` stays distinguishable from an
//! omitted field.

use core::time::Duration;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error as ThisError;

use crate::{DEFAULT_LOG_COUNT, DEFAULT_TIMEOUT_SECS};

/// Reasons a configuration file does not produce a [`RunConfiguration`].
///
/// All of them are recovered by the caller as "nothing to run".
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file at {} as JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("empty command in config")]
    EmptyCommand,
    #[error("invalid timeout {0}: must not be negative")]
    InvalidTimeout(i64),
}

/// The configuration document exactly as written, before defaults are applied.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct RawConfig {
    /// Command line to execute on pre-shutdown.
    pub command: Option<String>,
    /// Number of log files to keep.
    pub log_count: Option<i64>,
    /// Seconds to wait for the command, `0` for no limit.
    pub timeout: Option<i64>,
}

impl RawConfig {
    /// Reads and parses the document at `path` without normalizing it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fills defaults and validates the fields.
    ///
    /// A non-positive `log_count` falls back to the default, so an explicit `0`
    /// cannot disable log files from the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCommand`] if the trimmed command is empty and
    /// [`ConfigError::InvalidTimeout`] for a negative timeout.
    pub fn normalize(self) -> Result<RunConfiguration, ConfigError> {
        let command = self.command.as_deref().map(str::trim).unwrap_or_default();
        if command.is_empty() {
            return Err(ConfigError::EmptyCommand);
        }

        let timeout_secs = match self.timeout {
            None => DEFAULT_TIMEOUT_SECS,
            Some(secs) => u64::try_from(secs).map_err(|_| ConfigError::InvalidTimeout(secs))?,
        };

        let log_retention_count = match self.log_count {
            Some(count) if count > 0 => u32::try_from(count).unwrap_or(u32::MAX),
            _ => DEFAULT_LOG_COUNT,
        };

        Ok(RunConfiguration {
            command: command.to_owned(),
            timeout_secs,
            log_retention_count,
        })
    }
}

/// Fully normalized configuration for one pre-shutdown cycle.
///
/// The command is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    command: String,
    timeout_secs: u64,
    log_retention_count: u32,
}

impl RunConfiguration {
    /// Builds a configuration directly, returning `None` for a blank command.
    ///
    /// Unlike [`RawConfig::normalize`], a `log_retention_count` of `0` is kept
    /// and disables log files.
    #[must_use]
    pub fn new(command: &str, timeout_secs: u64, log_retention_count: u32) -> Option<Self> {
        let command = command.trim();
        (!command.is_empty()).then(|| Self {
            command: command.to_owned(),
            timeout_secs,
            log_retention_count,
        })
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// The deadline for the command, `None` meaning wait indefinitely.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }

    /// Maximum number of log files kept; `0` means no log file is written.
    #[must_use]
    pub const fn log_retention_count(&self) -> u32 {
        self.log_retention_count
    }
}

/// Reads, parses and normalizes the configuration at `path`.
///
/// # Errors
///
/// Any [`ConfigError`]; callers treat all of them as "no configuration".
pub fn load(path: &Path) -> Result<RunConfiguration, ConfigError> {
    let config = RawConfig::read(path)?.normalize()?;
    tracing::debug!(?path, ?config, "Loaded configuration");
    Ok(config)
}
