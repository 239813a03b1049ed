//! Bounded execution of the configured command.
//!
//! The child's exit and the deadline are raced; if the deadline wins the child
//! is killed and reaped before returning. Only the direct child is tracked:
//! processes it spawns itself are invisible here, so a configured command has
//! to wait for its own work before exiting.

use core::{fmt, time::Duration};
use std::{
    io,
    process::{ExitStatus, Stdio},
};

use thiserror::Error as ThisError;
use tokio::{process::Command, runtime, time};
use winpsp_common::TokenizeError;

/// Exit code reported for any unsuccessful exit, including crashes.
pub const GENERIC_FAILURE_EXIT_CODE: i32 = 1;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Reasons the command never ran to an observable exit.
#[derive(Debug, ThisError)]
pub enum LaunchError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error("failed to start {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("failed to wait for {program}: {source}")]
    Wait { program: String, source: io::Error },
    #[error("failed to set up process runtime: {0}")]
    Runtime(io::Error),
}

/// Result of one bounded run. Exactly one variant applies.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// The process exited before the deadline.
    Completed { exit_code: i32 },
    /// The deadline fired and the process was killed.
    TimedOut,
    /// The process could not be started.
    LaunchFailed(LaunchError),
}

impl ProcessOutcome {
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    /// Exit code of a completed run, `None` on timeout or launch failure.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match *self {
            Self::Completed { exit_code } => Some(exit_code),
            Self::TimedOut | Self::LaunchFailed(_) => None,
        }
    }
}

impl fmt::Display for ProcessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Completed { exit_code } => write!(f, "exited with code {exit_code}"),
            Self::TimedOut => f.write_str("timed out and was killed"),
            Self::LaunchFailed(ref e) => write!(f, "could not be run: {e}"),
        }
    }
}

/// Runs a tokenized command line to completion or deadline.
pub trait CommandRunner {
    /// `timeout` of `None` waits without limit.
    fn run(&self, tokens: &[String], timeout: Option<Duration>) -> ProcessOutcome;
}

/// [`CommandRunner`] that spawns a real process on a private single-threaded runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoundedProcessRunner;

impl CommandRunner for BoundedProcessRunner {
    fn run(&self, tokens: &[String], timeout: Option<Duration>) -> ProcessOutcome {
        match runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt.block_on(run_bounded(tokens, timeout)),
            Err(e) => ProcessOutcome::LaunchFailed(LaunchError::Runtime(e)),
        }
    }
}

/// Spawns `tokens[0]` with the remaining tokens as arguments and waits for it.
///
/// Standard streams are detached. Exit codes are collapsed to `0` for success
/// and [`GENERIC_FAILURE_EXIT_CODE`] for everything else.
pub async fn run_bounded(tokens: &[String], timeout: Option<Duration>) -> ProcessOutcome {
    let Some((program, args)) = tokens.split_first() else {
        return ProcessOutcome::LaunchFailed(TokenizeError::EmptyCommand.into());
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    #[cfg(windows)]
    command.creation_flags(CREATE_NO_WINDOW);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(source) => {
            return ProcessOutcome::LaunchFailed(LaunchError::Spawn {
                program: program.clone(),
                source,
            });
        }
    };
    tracing::debug!(pid = ?child.id(), %program, ?timeout, "Spawned command");

    let waited = match timeout {
        None => child.wait().await,
        Some(limit) => {
            let raced = time::timeout(limit, child.wait()).await;
            match raced {
                Ok(waited) => waited,
                Err(_elapsed) => {
                    if let Err(e) = child.kill().await {
                        tracing::warn!(%program, "Failed to kill timed out command: {e}");
                    }
                    return ProcessOutcome::TimedOut;
                }
            }
        }
    };

    match waited {
        Ok(status) => ProcessOutcome::Completed {
            exit_code: collapse_exit_status(status),
        },
        Err(source) => ProcessOutcome::LaunchFailed(LaunchError::Wait {
            program: program.clone(),
            source,
        }),
    }
}

fn collapse_exit_status(status: ExitStatus) -> i32 {
    if status.success() {
        0
    } else {
        GENERIC_FAILURE_EXIT_CODE
    }
}
