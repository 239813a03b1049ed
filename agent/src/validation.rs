//! Human-readable configuration check for the `test-config` subcommand.
//!
//! Shows what the file says field by field, then what the service would make
//! of it. Never runs the command.

use std::{
    io::{self, Write},
    path::Path,
};

use winpsp_common::{ConfigError, DEFAULT_LOG_COUNT, DEFAULT_TIMEOUT_SECS, RawConfig};

/// Writes the validation report for the configuration at `path` to `out`.
///
/// Read and parse failures are part of the report, not errors.
///
/// # Errors
///
/// Returns `Err` only if writing to `out` fails.
///
/// # Examples
///
/// ```
/// # use std::path::Path;
/// # use winpsp_agent::validation::write_config_report;
/// let mut out = Vec::new();
/// write_config_report(Path::new("does/not/exist.json"), &mut out).unwrap();
/// assert!(String::from_utf8(out).unwrap().starts_with("Config error:"));
/// ```
pub fn write_config_report(path: &Path, out: &mut impl Write) -> io::Result<()> {
    let raw = match RawConfig::read(path) {
        Ok(raw) => raw,
        Err(e @ ConfigError::Parse { .. }) => return writeln!(out, "JSON parse error: {e}"),
        Err(e) => return writeln!(out, "Config error: {e}"),
    };

    match raw.command.as_deref().map(str::trim) {
        Some(command) if !command.is_empty() => writeln!(out, "command: {command}")?,
        _ => writeln!(out, "command: empty → do nothing")?,
    }

    match raw.timeout {
        None => writeln!(out, "timeout: default ({DEFAULT_TIMEOUT_SECS} seconds)")?,
        Some(0) => writeln!(out, "timeout: 0 seconds (wait indefinitely)")?,
        Some(secs) => writeln!(out, "timeout: {secs} seconds")?,
    }

    match raw.log_count {
        None => writeln!(out, "log_count: default ({DEFAULT_LOG_COUNT} files)")?,
        Some(count) => writeln!(out, "log_count: {count} files")?,
    }

    match raw.normalize() {
        Ok(config) => writeln!(
            out,
            "Resolved: timeout {}s, keeping {} log files",
            config.timeout_secs(),
            config.log_retention_count()
        )?,
        Err(ConfigError::EmptyCommand) => {
            writeln!(out, "Resolved: nothing will run, shutdown is not held")?;
        }
        Err(e) => writeln!(out, "Resolved: config will be ignored ({e})")?,
    }

    writeln!(out, "Config test completed.")
}
