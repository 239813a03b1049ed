//! Service lifecycle: turns OS control events into at most one pre-shutdown cycle.
//!
//! The state machine here is platform-independent. The Windows service control
//! manager is wired up in [`windows`], which feeds events in and forwards status
//! reports out.

#[cfg(windows)]
pub mod windows;

use core::time::Duration;
use std::path::{Path, PathBuf};

use winpsp_common::{RunConfiguration, load};

use crate::{
    cycle::CycleController,
    runner::{CommandRunner, ProcessOutcome},
};

/// Extra time announced to the OS on top of the command's own timeout.
const STOP_GRACE: Duration = Duration::from_secs(30);

/// Wait hint announced when the command has no timeout.
const UNBOUNDED_WAIT_HINT: Duration = Duration::from_secs(24 * 60 * 60);

/// Control requests the service reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Stop,
    Shutdown,
    PreShutdown,
    Interrogate,
}

/// Status transitions reported back to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    StartPending,
    Running,
    /// `wait_hint` is how long the OS should expect to wait before the next report.
    StopPending { wait_hint: Duration },
    Stopped,
}

/// Receives status transitions; implemented by the platform glue.
pub trait StatusReporter {
    fn report(&mut self, status: ServiceStatus);
}

/// Everything one service run needs, owned in one place.
#[derive(Debug)]
pub struct ServiceContext<R> {
    config_path: PathBuf,
    controller: CycleController<R>,
}

impl<R: CommandRunner> ServiceContext<R> {
    /// Logs are kept next to the configuration file.
    pub fn new(config_path: PathBuf, runner: R) -> Self {
        let log_dir = log_dir_for(&config_path);
        Self {
            config_path,
            controller: CycleController::new(log_dir, runner),
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &CycleController<R> {
        &self.controller
    }

    /// Runs the service until it stops, returning the cycle outcome if one ran.
    ///
    /// The configuration is loaded fresh at start. Event consumption ends with
    /// the first stop, shutdown or pre-shutdown, so a second cycle never starts.
    /// Stopped is reported only once the cycle has returned.
    pub fn run<E, S>(&self, events: E, status: &mut S) -> Option<ProcessOutcome>
    where
        E: IntoIterator<Item = ControlEvent>,
        S: StatusReporter + ?Sized,
    {
        status.report(ServiceStatus::StartPending);

        let config = match load(&self.config_path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::info!("No usable configuration, shutdown will not be held: {e}");
                None
            }
        };

        let mut current = ServiceStatus::Running;
        status.report(current);

        let mut outcome = None;
        for event in events {
            tracing::debug!(?event, "Received control event");
            match event {
                ControlEvent::Interrogate => status.report(current),
                ControlEvent::Stop | ControlEvent::Shutdown => {
                    status.report(ServiceStatus::StopPending {
                        wait_hint: STOP_GRACE,
                    });
                    break;
                }
                ControlEvent::PreShutdown => {
                    current = ServiceStatus::StopPending {
                        wait_hint: stop_wait_hint(config.as_ref()),
                    };
                    status.report(current);
                    outcome = self.controller.run_cycle(config.as_ref());
                    break;
                }
            }
        }

        status.report(ServiceStatus::Stopped);
        outcome
    }
}

/// Directory holding `config_path`, or the working directory for a bare file name.
#[must_use]
pub fn log_dir_for(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn stop_wait_hint(config: Option<&RunConfiguration>) -> Duration {
    match config {
        None => STOP_GRACE,
        Some(config) => config
            .timeout()
            .map_or(UNBOUNDED_WAIT_HINT, |timeout| {
                timeout.saturating_add(STOP_GRACE).min(UNBOUNDED_WAIT_HINT)
            }),
    }
}
