//! Standalone `winpsp_agent` binary; the workspace ships the same entry point as `winpsp`.

use clap::Parser as _;
use eyre::Result;

use winpsp_agent::{cli::Cli, inner_main};

fn main() -> Result<()> {
    inner_main(Cli::parse())
}
