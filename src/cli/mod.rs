//! The `ontarget-host` command-line interface.
//!
//! Runs the built-in suites through the same entry point a test image uses, with
//! a terminal channel and a halt that exits the process.

use std::io::{self, Write};

use clap::Parser;

use crate::cli::args::{Command, HostArgs, Suite};
use crate::config::{ColorMode, HarnessConfig};
use crate::errors::HarnessError;
use crate::report::host::TermChannel;
use crate::runner::{run_tests, ExitProcess};

pub mod args;

/// The main entry point for the CLI.
pub fn run() -> miette::Result<()> {
    let args = HostArgs::parse();

    match args.command {
        Command::Run { suite, color } => handle_run(suite, color),
        Command::List { suite } => Ok(handle_list(suite)?),
    }
}

/// Handles the `run` subcommand. Exits with 0 when every case passes, 1 on the
/// first failure.
fn handle_run(suite: Suite, color: ColorMode) -> ! {
    let config = HarnessConfig::new().with_colors(color.resolve());
    let mut channel = TermChannel::stdout(color);
    run_tests(suite.registry(), &mut channel, &mut ExitProcess, config)
}

fn handle_list(suite: Suite) -> Result<(), HarnessError> {
    let mut stdout = io::stdout().lock();
    for name in suite.registry().names() {
        writeln!(stdout, "{name}")?;
    }
    Ok(())
}
