//! Integration tests for the `test-config` subcommand.

use serde_json::json;

use crate::common::{ConfigDir, winpsp};

#[test]
fn reports_fields_without_running_anything() {
    let scratch = tempfile::tempdir().unwrap();
    let marker = scratch.path().join("marker");
    let cfg = ConfigDir::with(&json!({
        "command": format!("touch \"{}\"", marker.display()),
        "timeout": 0,
    }));

    let output = winpsp(&["test-config", "--config", cfg.config_arg()]);

    assert!(output.status.success(), "test-config should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("WinPSP version"), "{stdout}");
    assert!(stdout.contains("timeout: 0 seconds"), "{stdout}");
    assert!(stdout.contains("log_count: default (7 files)"), "{stdout}");
    assert!(stdout.contains("Config test completed."), "{stdout}");
    assert!(!marker.exists(), "test-config must not execute the command");
    assert!(cfg.log_files().is_empty(), "test-config must not write logs");
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");

    let output = winpsp(&["test-config", "--config", missing.to_str().unwrap()]);

    assert!(output.status.success(), "a bad config is not a process failure");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config error:"), "{stdout}");
}
