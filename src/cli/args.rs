//! Command-line arguments for `ontarget-host`.

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::ColorMode;
use crate::registry::Registry;
use crate::selftest::{SELFTEST, SHOWCASE};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "ontarget-host",
    version,
    about = "Runs ontarget's built-in suites on the host."
)]
pub struct HostArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a suite through the test entry point and exit with its result.
    Run {
        #[arg(long, value_enum, default_value_t = Suite::Selftest)]
        suite: Suite,
        /// When to colour the ok/error markers.
        #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
        color: ColorMode,
    },
    /// Print a suite's case names in execution order.
    List {
        #[arg(long, value_enum, default_value_t = Suite::Selftest)]
        suite: Suite,
    },
}

/// The built-in suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Suite {
    /// Equality engine contract checks.
    Selftest,
    /// Three cases where the second fails.
    Showcase,
}

impl Suite {
    pub fn registry(self) -> Registry {
        match self {
            Suite::Selftest => SELFTEST,
            Suite::Showcase => SHOWCASE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        HostArgs::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let args = HostArgs::try_parse_from(["ontarget-host", "run"]).unwrap();
        match args.command {
            Command::Run { suite, color } => {
                assert_eq!(suite, Suite::Selftest);
                assert_eq!(color, ColorMode::Auto);
            }
            Command::List { .. } => panic!("parsed as list"),
        }
    }

    #[test]
    fn test_suite_selection() {
        let args =
            HostArgs::try_parse_from(["ontarget-host", "list", "--suite", "showcase"]).unwrap();
        let Command::List { suite } = args.command else {
            panic!("parsed as run");
        };
        assert_eq!(suite.registry().len(), 3);
    }
}
