//! Host simulation of a full run.
//!
//! [`simulate`] calls the real [`run_tests`] entry point with a halt that unwinds
//! instead of parking the CPU, so the never-returning contract can be exercised
//! under `cargo test`.

use std::panic::{self, AssertUnwindSafe};

use super::{run_tests, Halt, Terminal};
use crate::config::HarnessConfig;
use crate::registry::Registry;
use crate::report::host::Transcript;

/// Halts by unwinding with the [`Terminal`] as payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unwind;

impl Halt for Unwind {
    fn halt(&mut self, terminal: Terminal) -> ! {
        panic::resume_unwind(Box::new(terminal))
    }
}

/// Outcome of a simulated run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    pub terminal: Terminal,
    /// Everything the reporter wrote.
    pub transcript: String,
}

impl Simulation {
    pub fn exit_code(&self) -> i32 {
        self.terminal.exit_code()
    }
}

/// Runs `registry` to its halt and captures the transcript.
///
/// Panics that are not a halt (a bug in the harness itself) are propagated.
pub fn simulate(registry: Registry, config: HarnessConfig) -> Simulation {
    let mut transcript = Transcript::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run_tests(registry, &mut transcript, &mut Unwind, config);
    }));
    let terminal = match outcome {
        Ok(()) => unreachable!("run_tests returned"),
        Err(payload) => match payload.downcast::<Terminal>() {
            Ok(terminal) => *terminal,
            Err(other) => panic::resume_unwind(other),
        },
    };
    Simulation {
        terminal,
        transcript: transcript.into_string(),
    }
}
