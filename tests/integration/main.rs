//! Uses the single integration test approach.
//!
//! This improves parallelism when running the tests, and reduces the number of binaries that have to be built (and linked)

mod common;
mod run;
mod test_config;

use common::winpsp;

#[test]
fn help_lists_subcommands() {
    let output = winpsp(&["--help"]);
    assert!(output.status.success(), "--help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["service", "run", "test-config"] {
        assert!(stdout.contains(sub), "help should mention {sub}: {stdout}");
    }
}

#[test]
fn version_is_reported() {
    let output = winpsp(&["--version"]);
    assert!(output.status.success(), "--version should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "{stdout}");
}

#[cfg(not(windows))]
#[test]
fn service_mode_needs_windows() {
    let output = winpsp(&["service"]);
    assert!(!output.status.success(), "service mode must fail off Windows");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("only available on Windows"), "{stderr}");
}
