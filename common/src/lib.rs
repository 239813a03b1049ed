//! Platform-independent building blocks for the pre-shutdown agent.
//!
//! This crate provides:
//! - Splitting of the configured command line into program and arguments
//! - Loading and normalizing the JSON run configuration
//! - Retention-bounded rotation of per-cycle log files

extern crate alloc;
extern crate core;

pub mod command_line;
pub mod config;
pub mod log_rotation;

pub use command_line::{TokenizeError, tokenize};
pub use config::{ConfigError, RawConfig, RunConfiguration, load};
pub use log_rotation::{RotationError, is_log_file_name, log_file_name, rotate};

/// Name under which the agent registers with the service control manager.
pub const SERVICE_NAME: &str = "WinPSP";

/// Location of the configuration file when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = r"C:\ProgramData\WinPSP\config.json";

/// Log files retained when the configuration does not say otherwise.
pub const DEFAULT_LOG_COUNT: u32 = 7;

/// Seconds the configured command may run when the configuration does not say otherwise.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
