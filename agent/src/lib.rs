//! Library entry for the `winpsp_agent` crate.
//!
//! Exposes `inner_main` so the workspace-level shim binary can call into the agent logic.
//!
//! Holds the Windows pre-shutdown phase open until the configured command has
//! finished or timed out.
#![cfg_attr(
    test,
    expect(clippy::indexing_slicing, reason = "This is not problematic in tests")
)]

extern crate alloc;
extern crate core;

pub mod cli;
pub mod cycle;
pub mod cycle_log;
pub mod runner;
pub mod service;
pub mod validation;

use std::{env, io, sync::Once};

use eyre::{Result, WrapErr as _};
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};
use winpsp_common::load;

use cli::{Cli, Command, LogFormat, RunArgs};
use cycle::CycleController;
use runner::BoundedProcessRunner;
use service::log_dir_for;

static INIT_TRACING: Once = Once::new();

/// The agent's main function; can be called from a shim binary.
///
/// # Errors
///
/// Returns an error if the service dispatcher cannot start or the report
/// cannot be written to stdout. Configuration and command failures are not
/// errors.
pub fn inner_main(invocation: Cli) -> Result<()> {
    match invocation.command {
        Command::Service(_) => run_as_service(),
        Command::Run(args) => {
            run_interactive(&args);
            Ok(())
        }
        Command::TestConfig(args) => {
            print_banner();
            println!("WinPSP: Testing config file {}...", args.config.display());
            validation::write_config_report(&args.config, &mut io::stdout().lock())
                .wrap_err("Failed to write config report")
        }
    }
}

fn print_banner() {
    println!("WinPSP version {}", env!("CARGO_PKG_VERSION"));
}

/// In service mode no subscriber is installed: the cycle log is the only output.
#[cfg(windows)]
fn run_as_service() -> Result<()> {
    service::windows::run_dispatcher()
        .wrap_err("Failed to start the service dispatcher, was this started by the service control manager?")
}

#[cfg(not(windows))]
fn run_as_service() -> Result<()> {
    eyre::bail!("Service mode is only available on Windows, use `run` to execute one cycle")
}

fn run_interactive(args: &RunArgs) {
    init_tracing(args.log_format);
    print_banner();
    println!("Running in interactive mode (debug).");

    let config_path = &args.config.config;
    let config = match load(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Config error: {e}");
            println!("Nothing will be executed. Exiting.");
            return;
        }
    };

    let controller = CycleController::new(log_dir_for(config_path), BoundedProcessRunner);
    if let Some(outcome) = controller.run_cycle(Some(&config)) {
        println!("Command {outcome}.");
    }
}

fn init_tracing(format: LogFormat) {
    INIT_TRACING.call_once(move || {
        let default_level = if env::var("WINPSP_INTEGRATION_TEST").is_ok() {
            "error"
        } else {
            "info"
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_timer(ChronoLocal::rfc_3339())
            .with_writer(io::stderr);

        match format {
            LogFormat::Compact => builder.compact().init(),
            LogFormat::Json => builder.json().init(),
            LogFormat::Pretty => builder.pretty().init(),
        }
    });
}
