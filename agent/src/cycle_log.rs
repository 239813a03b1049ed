//! The per-cycle log file.
//!
//! Every line is written straight through to the file, so whatever happened
//! before the machine powers off is already on disk.

use core::fmt;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use winpsp_common::log_file_name;

const LINE_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sink for the lines of one cycle, possibly without a backing file.
#[derive(Debug, Default)]
pub struct CycleLog {
    file: Option<(PathBuf, File)>,
}

impl CycleLog {
    /// A sink that only forwards to tracing.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { file: None }
    }

    /// Creates `dir` if needed and opens the log file for a cycle started at `started`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the file cannot be created.
    pub fn open(dir: &Path, started: DateTime<Local>) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(log_file_name(started.naive_local()));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!(?path, "Opened cycle log");
        Ok(Self {
            file: Some((path, file)),
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|(path, _)| path.as_path())
    }

    /// Appends `[YYYY-MM-DD HH:MM:SS] message` to the file.
    ///
    /// A failed write drops the file and the rest of the cycle goes unlogged.
    pub fn record(&mut self, message: impl fmt::Display) {
        tracing::info!("{message}");
        let Some((path, file)) = self.file.as_mut() else {
            return;
        };
        let stamp = Local::now().format(LINE_STAMP_FORMAT);
        if let Err(e) = writeln!(file, "[{stamp}] {message}") {
            tracing::warn!(?path, "Failed to write cycle log, continuing without it: {e}");
            self.file = None;
        }
    }

    /// Flushes the file to disk and closes it.
    pub fn close(self) {
        let Some((path, file)) = self.file else {
            return;
        };
        if let Err(e) = file.sync_all() {
            tracing::warn!(?path, "Failed to sync cycle log: {e}");
        }
    }
}
