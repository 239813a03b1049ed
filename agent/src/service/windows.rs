//! Windows service control manager glue.
//!
//! The control handler runs on a thread owned by the SCM. It only forwards
//! events into a channel; the service thread drains that channel through
//! [`ServiceContext::run`] and reports status back via [`ScmReporter`].

use core::time::Duration;
use std::{
    env,
    ffi::OsString,
    path::PathBuf,
    sync::mpsc,
};

use clap::Parser as _;
use windows_service::{
    define_windows_service,
    service::{
        ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState,
        ServiceStatus as ScmStatus, ServiceType,
    },
    service_control_handler::{self, ServiceControlHandlerResult, ServiceStatusHandle},
    service_dispatcher,
};
use winpsp_common::{DEFAULT_CONFIG_PATH, SERVICE_NAME};

use super::{ControlEvent, ServiceContext, ServiceStatus, StatusReporter};
use crate::{
    cli::{Cli, Command},
    runner::BoundedProcessRunner,
};

define_windows_service!(ffi_service_main, service_main);

/// Hands the current thread to the SCM dispatcher until the service stops.
///
/// # Errors
///
/// Fails when the process was not started by the service control manager.
pub fn run_dispatcher() -> windows_service::Result<()> {
    service_dispatcher::start(SERVICE_NAME, ffi_service_main)
}

fn service_main(_arguments: Vec<OsString>) {
    // Nothing is listening for errors in service mode; the SCM sees the stop.
    drop(run_service(config_path_from_args()));
}

/// The SCM passes only start parameters to `service_main`; the configured
/// `service --config` path comes from the process command line.
fn config_path_from_args() -> PathBuf {
    match Cli::try_parse_from(env::args_os()) {
        Ok(Cli {
            command: Command::Service(args),
        }) => args.config,
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

fn run_service(config_path: PathBuf) -> windows_service::Result<()> {
    let (tx, rx) = mpsc::channel();

    let handler = move |control| {
        let event = match control {
            ServiceControl::Interrogate => ControlEvent::Interrogate,
            ServiceControl::Stop => ControlEvent::Stop,
            ServiceControl::Shutdown => ControlEvent::Shutdown,
            ServiceControl::Preshutdown => ControlEvent::PreShutdown,
            _ => return ServiceControlHandlerResult::NotImplemented,
        };
        // The receiver is gone once the service has stopped.
        drop(tx.send(event));
        ServiceControlHandlerResult::NoError
    };

    let handle = service_control_handler::register(SERVICE_NAME, handler)?;
    let mut reporter = ScmReporter::new(handle);

    let context = ServiceContext::new(config_path, BoundedProcessRunner);
    drop(context.run(rx, &mut reporter));

    reporter.into_result()
}

/// Maps [`ServiceStatus`] onto SCM status updates.
struct ScmReporter {
    handle: ServiceStatusHandle,
    checkpoint: u32,
    first_error: Option<windows_service::Error>,
}

impl ScmReporter {
    const fn new(handle: ServiceStatusHandle) -> Self {
        Self {
            handle,
            checkpoint: 0,
            first_error: None,
        }
    }

    fn into_result(self) -> windows_service::Result<()> {
        self.first_error.map_or(Ok(()), Err)
    }
}

impl StatusReporter for ScmReporter {
    fn report(&mut self, status: ServiceStatus) {
        let (current_state, controls_accepted, wait_hint) = match status {
            ServiceStatus::StartPending => (
                ServiceState::StartPending,
                ServiceControlAccept::empty(),
                Duration::from_secs(10),
            ),
            ServiceStatus::Running => (
                ServiceState::Running,
                ServiceControlAccept::STOP
                    | ServiceControlAccept::SHUTDOWN
                    | ServiceControlAccept::PRESHUTDOWN,
                Duration::ZERO,
            ),
            ServiceStatus::StopPending { wait_hint } => (
                ServiceState::StopPending,
                ServiceControlAccept::empty(),
                wait_hint,
            ),
            ServiceStatus::Stopped => (
                ServiceState::Stopped,
                ServiceControlAccept::empty(),
                Duration::ZERO,
            ),
        };

        self.checkpoint = match current_state {
            ServiceState::StartPending | ServiceState::StopPending => self.checkpoint + 1,
            _ => 0,
        };

        let result = self.handle.set_service_status(ScmStatus {
            service_type: ServiceType::OWN_PROCESS,
            current_state,
            controls_accepted,
            exit_code: ServiceExitCode::Win32(0),
            checkpoint: self.checkpoint,
            wait_hint,
            process_id: None,
        });
        if let Err(e) = result {
            tracing::warn!(?status, "Failed to report service status: {e}");
            self.first_error.get_or_insert(e);
        }
    }
}
