//! Integration tests for the interactive `run` subcommand.

use std::{
    fs,
    time::{Duration, Instant},
};

use serde_json::json;

use crate::common::{ConfigDir, winpsp};

#[test]
fn absent_command_runs_nothing() {
    let cfg = ConfigDir::with(&json!({ "command": "   " }));

    let output = winpsp(&["run", "--config", cfg.config_arg()]);

    assert!(output.status.success(), "empty command is not a failure");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing will be executed."), "{stdout}");
    assert!(cfg.log_files().is_empty(), "no log file expected");
}

#[test]
fn negative_timeout_runs_nothing() {
    let cfg = ConfigDir::with(&json!({ "command": "true", "timeout": -1 }));
    let output = winpsp(&["run", "--config", cfg.config_arg()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("invalid timeout"), "{stdout}");
    assert!(cfg.log_files().is_empty(), "no log file expected");
}

#[cfg(unix)]
#[test]
fn command_runs_and_is_logged() {
    let scratch = tempfile::tempdir().unwrap();
    let marker = scratch.path().join("marker");
    let cfg = ConfigDir::with(&json!({
        "command": format!("touch \"{}\"", marker.display()),
        "log_count": 2,
    }));
    fs::write(cfg.path().join("winpsp-20000101-000000.log"), "").unwrap();
    fs::write(cfg.path().join("winpsp-20000101-000001.log"), "").unwrap();

    let output = winpsp(&["run", "--config", cfg.config_arg()]);

    assert!(output.status.success(), "run should succeed");
    assert!(marker.exists(), "command should have created the marker");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Command exited with code 0."), "{stdout}");

    let logs = cfg.log_files();
    assert_eq!(logs.len(), 2, "rotation should keep two files: {logs:?}");
    assert_eq!(logs[0], "winpsp-20000101-000001.log");
    let content = fs::read_to_string(cfg.path().join(&logs[1])).unwrap();
    assert!(content.contains("WinPSP: Shutdown triggered (PRESHUTDOWN)"), "{content}");
    assert!(content.contains("Exit code: 0"), "{content}");
    assert!(content.contains("Shutdown released"), "{content}");
}

#[cfg(unix)]
#[test]
fn timeout_bounds_the_cycle() {
    let cfg = ConfigDir::with(&json!({ "command": "sleep 30", "timeout": 1 }));

    let started = Instant::now();
    let output = winpsp(&["run", "--config", cfg.config_arg()]);

    assert!(output.status.success(), "timeout is not a failure");
    assert!(
        started.elapsed() < Duration::from_secs(15),
        "cycle should end near the timeout"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("timed out"), "{stdout}");
    let logs = cfg.log_files();
    let content = fs::read_to_string(cfg.path().join(&logs[0])).unwrap();
    assert!(content.contains("Timeout after 1 seconds"), "{content}");
}

#[test]
fn unknown_executable_is_logged_as_error() {
    let cfg = ConfigDir::with(&json!({ "command": "winpsp-no-such-program-xyz --flag" }));

    let output = winpsp(&["run", "--config", cfg.config_arg()]);

    assert!(output.status.success(), "launch failures are absorbed");
    let logs = cfg.log_files();
    assert_eq!(logs.len(), 1, "{logs:?}");
    let content = fs::read_to_string(cfg.path().join(&logs[0])).unwrap();
    assert!(content.contains("Command error: failed to start"), "{content}");
    assert!(content.contains("Shutdown released"), "{content}");
}
