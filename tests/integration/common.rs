//! Common utilities for integration tests.

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tempfile::TempDir;

fn get_winpsp_bin() -> &'static str {
    env!("CARGO_BIN_EXE_winpsp")
}

/// Runs the `winpsp` binary to completion with quiet diagnostics.
pub fn winpsp(args: &[&str]) -> Output {
    Command::new(get_winpsp_bin())
        .args(args)
        .env("WINPSP_INTEGRATION_TEST", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run winpsp")
}

/// A scratch directory holding `config.json` with the given JSON value.
pub struct ConfigDir {
    pub dir: TempDir,
    pub config: PathBuf,
}

impl ConfigDir {
    pub fn with(config: &serde_json::Value) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, config.to_string()).expect("failed to write config");
        Self { dir, config: path }
    }

    pub fn config_arg(&self) -> &str {
        self.config.to_str().expect("temp path should be UTF-8")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Names of `winpsp-*.log` files in the directory, sorted.
    pub fn log_files(&self) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(self.path())
            .expect("failed to list temp dir")
            .map(|e| e.expect("bad dir entry").file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("winpsp-") && n.ends_with(".log"))
            .collect();
        names.sort();
        names
    }
}
