//! Shim binary that calls into the `winpsp_agent` library's `inner_main`.
use clap::Parser as _;
use eyre::Result;

fn main() -> Result<()> {
    // Delegate to library entrypoint
    winpsp_agent::inner_main(winpsp_agent::cli::Cli::parse())
}
