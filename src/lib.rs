//! # ontarget
//!
//! An on-target test harness for bare-metal images: a structural equality engine
//! that explains the first difference it finds, and a runner that executes an
//! ordered registry of test cases, reports progress over a write-only diagnostic
//! channel and halts on the first failure.
//!
//! ```no_run
//! use ontarget::prelude::*;
//!
//! #[derive(Debug)]
//! struct Reading {
//!     channel: u8,
//!     millivolts: u16,
//! }
//! ontarget::comparable_struct!(Reading { channel, millivolts });
//!
//! fn reads_reference() -> Result<(), Failure> {
//!     let expected = Reading { channel: 0, millivolts: 1200 };
//!     check_equal(&expected, &Reading { channel: 0, millivolts: 1200 })?;
//!     Ok(())
//! }
//!
//! ontarget::test_suite! {
//!     static SUITE = [reads_reference];
//! }
//!
//! let mut uart = FmtChannel(String::new());
//! run_tests(SUITE, &mut uart, &mut Spin, HarnessConfig::new());
//! ```
//!
//! Without the `std` feature the crate is `no_std` and never allocates.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod config;
pub mod equality;
pub mod errors;
pub mod registry;
pub mod report;
pub mod runner;
pub mod selftest;

#[cfg(feature = "cli")]
pub mod cli;

pub use crate::config::{BuildMode, ColorMode, HarnessConfig};
pub use crate::equality::{
    assert_equal, assert_slice_contents, check_equal, check_field, check_slice_contents,
    Comparable, Mismatch, MismatchKind, Segment, Shape, Vector,
};
pub use crate::errors::{Failure, HarnessError, Message};
pub use crate::registry::{Registry, TestCase, TestOutcome};
pub use crate::report::{Channel, FmtChannel, NullChannel, Reporter, Style};
pub use crate::runner::{report_fatal, report_panic, run_tests, Halt, Idle, Spin, Terminal};

#[cfg(feature = "std")]
pub use crate::runner::ExitProcess;

/// Everything a test image usually needs.
pub mod prelude {
    pub use crate::config::HarnessConfig;
    pub use crate::equality::{
        assert_equal, assert_slice_contents, check_equal, check_slice_contents, Comparable,
        Vector,
    };
    pub use crate::errors::Failure;
    pub use crate::registry::Registry;
    pub use crate::report::{Channel, FmtChannel};
    pub use crate::runner::{run_tests, Halt, Spin};
}
