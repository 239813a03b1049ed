//! One pre-shutdown cycle: open log, rotate, run the command, record the outcome.
//!
//! Nothing in here fails. Every problem is written to the cycle log (if there
//! is one) and the cycle carries on until shutdown is released.

use std::path::{Path, PathBuf};

use chrono::Local;
use winpsp_common::{RunConfiguration, rotate, tokenize};

use crate::{
    cycle_log::CycleLog,
    runner::{CommandRunner, ProcessOutcome},
};

/// Drives pre-shutdown cycles against a fixed log directory.
#[derive(Debug)]
pub struct CycleController<R> {
    log_dir: PathBuf,
    runner: R,
}

impl<R: CommandRunner> CycleController<R> {
    pub const fn new(log_dir: PathBuf, runner: R) -> Self {
        Self { log_dir, runner }
    }

    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs one cycle and returns the outcome, or `None` if there was no configuration.
    ///
    /// Without a configuration nothing is touched: no log file, no process.
    pub fn run_cycle(&self, config: Option<&RunConfiguration>) -> Option<ProcessOutcome> {
        let Some(config) = config else {
            tracing::debug!("No configuration, releasing shutdown immediately");
            return None;
        };

        let mut log = self.open_log(config);

        log.record("WinPSP: Shutdown triggered (PRESHUTDOWN)");
        log.record(format_args!("Running: {}", config.command()));

        let outcome = match tokenize(config.command()) {
            Ok(tokens) => self.runner.run(&tokens, config.timeout()),
            Err(e) => ProcessOutcome::LaunchFailed(e.into()),
        };

        match outcome {
            ProcessOutcome::Completed { exit_code } => {
                log.record(format_args!("Exit code: {exit_code}"));
            }
            ProcessOutcome::TimedOut => {
                log.record(format_args!(
                    "Timeout after {} seconds",
                    config.timeout_secs()
                ));
            }
            ProcessOutcome::LaunchFailed(ref e) => {
                log.record(format_args!("Command error: {e}"));
            }
        }

        log.record("Shutdown released");
        log.close();
        Some(outcome)
    }

    /// Opens this cycle's log file and trims old ones; any failure degrades to no file.
    fn open_log(&self, config: &RunConfiguration) -> CycleLog {
        let retention = config.log_retention_count();
        if retention == 0 {
            return CycleLog::disabled();
        }

        let log = match CycleLog::open(&self.log_dir, Local::now()) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(log_dir = ?self.log_dir, "Cannot open cycle log, continuing without: {e}");
                CycleLog::disabled()
            }
        };

        // The new file counts towards the retention but is never a candidate,
        // even if an older cycle's name sorts after it.
        let current = log
            .path()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str());
        match rotate(&self.log_dir, retention, current) {
            Ok(removed) => tracing::debug!(removed, "Rotated cycle logs"),
            Err(e) => tracing::warn!("Log rotation failed: {e}"),
        }

        log
    }
}
