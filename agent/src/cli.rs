//! Command-line interface definitions for the agent.
//!
//! The same binary is registered with the service control manager (`service`)
//! and used by hand for debugging (`run`) and validation (`test-config`).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use winpsp_common::DEFAULT_CONFIG_PATH;

/// Top-level command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "winpsp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run under the Windows service control manager.
    Service(ConfigArgs),

    /// Run one shutdown cycle right now, in the foreground.
    Run(RunArgs),

    /// Check the configuration file without executing anything.
    TestConfig(ConfigArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct ConfigArgs {
    /// Path to the JSON configuration file. Log files are written next to it.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Format of diagnostic output on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
    Pretty,
}
