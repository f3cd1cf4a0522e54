//! Command-line entry point.
//!
//! ```bash
//! county-panel --dir data clean
//! county-panel --dir data summary-json
//! county-panel --dir data all --force
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Held until exit so buffered file logs are flushed.
    let _guards = county_panel::logging::init(cli.log_dir.as_deref())?;

    if let Err(e) = cli::run_command(cli) {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
