//! Retention-bounded rotation of per-cycle log files.
//!
//! Log files are named `winpsp-YYYYMMDD-HHMMSS.log`, so sorting by name is the
//! same as sorting by creation time.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use thiserror::Error as ThisError;

pub const LOG_FILE_PREFIX: &str = "winpsp-";
pub const LOG_FILE_EXT: &str = ".log";

/// Timestamp layout embedded in log file names.
const FILE_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, ThisError)]
pub enum RotationError {
    #[error("failed to list log directory {}: {source}", dir.display())]
    ReadDir { dir: PathBuf, source: io::Error },
}

/// File name of the log written by a cycle started at `started`.
#[must_use]
pub fn log_file_name(started: NaiveDateTime) -> String {
    format!(
        "{LOG_FILE_PREFIX}{}{LOG_FILE_EXT}",
        started.format(FILE_STAMP_FORMAT)
    )
}

/// Whether `name` follows the log file naming convention.
#[must_use]
pub fn is_log_file_name(name: &str) -> bool {
    name.len() > LOG_FILE_PREFIX.len() + LOG_FILE_EXT.len()
        && name.starts_with(LOG_FILE_PREFIX)
        && name.ends_with(LOG_FILE_EXT)
}

/// Deletes the oldest log files in `dir` until at most `retention_count` remain.
///
/// The file named `keep` is never deleted but still counts towards the
/// retention, wherever it sorts. A `retention_count` of `0` deletes nothing.
/// Files that fail to delete are skipped. Returns the number of files removed.
///
/// # Errors
///
/// Returns [`RotationError::ReadDir`] if the directory cannot be listed.
pub fn rotate(
    dir: &Path,
    retention_count: u32,
    keep: Option<&str>,
) -> Result<usize, RotationError> {
    if retention_count == 0 {
        return Ok(0);
    }

    let read_dir_err = |source| RotationError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut logs = Vec::new();
    let mut kept = 0;
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        if !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if keep == Some(name.as_str()) {
            kept = 1;
        } else if is_log_file_name(&name) {
            logs.push(name);
        }
    }

    let budget = usize::try_from(retention_count)
        .unwrap_or(usize::MAX)
        .saturating_sub(kept);
    if logs.len() <= budget {
        return Ok(0);
    }

    logs.sort_unstable();
    let excess = logs.len() - budget;
    let mut removed = 0;
    for name in logs.iter().take(excess) {
        let path = dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(?path, "Removed old log file");
                removed += 1;
            }
            Err(e) => tracing::warn!(?path, "Failed to remove old log file: {e}"),
        }
    }

    Ok(removed)
}
