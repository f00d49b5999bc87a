//! # Runner
//!
//! Drives a [`Registry`] one case at a time through an explicit state machine:
//!
//! ```text
//! NotStarted -> Running(0) -> Running(1) -> ... -> Running(n) -> AllPassed
//!                   |              |
//!                   +--------------+-------------------------> Aborted
//! ```
//!
//! The first failing case is reported and ends the run; later cases are never
//! invoked. Both terminal states hand control to a [`Halt`], which never returns:
//! on target the test image is the whole program.
//!
//! Without `std` a failing [`assert_equal`](crate::assert_equal) panics straight
//! into the firmware's `#[panic_handler]`, which should forward to
//! [`report_panic`]. The runner records the case in flight so that report can
//! name it.

use core::fmt;
use core::ptr;
use core::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

use crate::config::{BuildMode, HarnessConfig};
use crate::errors::Failure;
use crate::registry::{Registry, TestCase};
use crate::report::{Channel, Reporter};

#[cfg(feature = "std")]
pub mod sim;

// ============================================================================
// STATES
// ============================================================================

/// Where a [`Runner`] is in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    NotStarted,
    /// The next case to execute. `Running(len)` means every case has passed.
    Running(usize),
    AllPassed,
    Aborted,
}

impl RunnerState {
    pub const fn terminal(self) -> Option<Terminal> {
        match self {
            RunnerState::AllPassed => Some(Terminal::AllPassed),
            RunnerState::Aborted => Some(Terminal::Aborted),
            RunnerState::NotStarted | RunnerState::Running(_) => None,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    AllPassed,
    Aborted,
    /// The entry point was called from an image not built for testing.
    Misuse,
}

impl Terminal {
    /// Process exit code used where the platform has one.
    pub const fn exit_code(self) -> i32 {
        match self {
            Terminal::AllPassed => 0,
            Terminal::Aborted => 1,
            Terminal::Misuse => 2,
        }
    }
}

// ============================================================================
// HALTS
// ============================================================================

/// The end of execution.
pub trait Halt {
    fn halt(&mut self, terminal: Terminal) -> !;
}

/// Busy-waits forever.
#[derive(Debug, Default, Clone, Copy)]
pub struct Spin;

impl Halt for Spin {
    fn halt(&mut self, _terminal: Terminal) -> ! {
        loop {
            core::hint::spin_loop();
        }
    }
}

/// Calls a platform idle hook (such as `cortex_m::asm::wfi`) forever.
pub struct Idle<F: FnMut()>(pub F);

impl<F: FnMut()> Halt for Idle<F> {
    fn halt(&mut self, _terminal: Terminal) -> ! {
        loop {
            (self.0)();
        }
    }
}

/// Exits the host process with [`Terminal::exit_code`].
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ExitProcess;

#[cfg(feature = "std")]
impl Halt for ExitProcess {
    fn halt(&mut self, terminal: Terminal) -> ! {
        std::process::exit(terminal.exit_code())
    }
}

// ============================================================================
// GLOBAL SLOTS
// ============================================================================

// Single words written with plain loads and stores: thumbv6m has no
// compare-and-swap, and there is one thread of control on target.
static ACTIVE_CASE: AtomicPtr<TestCase> = AtomicPtr::new(ptr::null_mut());
static FAILURE_LATCH: AtomicBool = AtomicBool::new(false);

/// The case whose body is currently executing, if any.
pub fn active_case() -> Option<&'static TestCase> {
    let case = ACTIVE_CASE.load(Ordering::Acquire);
    // SAFETY: the slot only ever holds null or a pointer derived from a
    // `&'static TestCase` in `Runner::execute`.
    unsafe { case.cast_const().as_ref() }
}

fn enter_case(case: &'static TestCase) {
    ACTIVE_CASE.store(ptr::from_ref(case).cast_mut(), Ordering::Release);
}

fn leave_case() {
    ACTIVE_CASE.store(ptr::null_mut(), Ordering::Release);
}

// ============================================================================
// RUNNER
// ============================================================================

/// Sequential executor over a registry.
pub struct Runner<'c> {
    registry: Registry,
    reporter: Reporter<'c>,
    config: HarnessConfig,
    state: RunnerState,
    passed: usize,
}

impl<'c> Runner<'c> {
    pub fn new(registry: Registry, channel: &'c mut dyn Channel, config: HarnessConfig) -> Self {
        Self {
            registry,
            reporter: Reporter::new(channel, config.use_colors),
            config,
            state: RunnerState::NotStarted,
            passed: 0,
        }
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Advances by one transition and returns the new state. Terminal states
    /// are absorbing.
    pub fn step(&mut self) -> RunnerState {
        self.state = match self.state {
            RunnerState::NotStarted => {
                if self.config.banner {
                    self.reporter.banner(self.registry.len());
                }
                RunnerState::Running(0)
            }
            RunnerState::Running(index) => match self.registry.get(index) {
                Some(case) => self.execute(index, case),
                None => {
                    self.reporter.summary(self.passed);
                    RunnerState::AllPassed
                }
            },
            terminal @ (RunnerState::AllPassed | RunnerState::Aborted) => terminal,
        };
        self.state
    }

    fn execute(&mut self, index: usize, case: &'static TestCase) -> RunnerState {
        self.reporter.running(case.name());
        enter_case(case);
        let outcome = invoke(case);
        leave_case();
        match outcome {
            Ok(()) => {
                self.passed += 1;
                self.reporter.ok();
                RunnerState::Running(index + 1)
            }
            Err(failure) => {
                self.reporter.failed(case.name(), &failure);
                RunnerState::Aborted
            }
        }
    }

    /// Steps until a terminal state, then halts.
    pub fn run(mut self, halt: &mut dyn Halt) -> ! {
        loop {
            if let Some(terminal) = self.step().terminal() {
                halt.halt(terminal)
            }
        }
    }
}

#[cfg(feature = "std")]
std::thread_local! {
    static CATCHING: core::cell::Cell<bool> = const { core::cell::Cell::new(false) };
}

/// Whether a runner on this thread is executing a body and will catch its
/// failures.
#[cfg(feature = "std")]
pub(crate) fn catching_failures() -> bool {
    CATCHING.with(core::cell::Cell::get)
}

// A failing `assert_equal` unwinds with a `Failure` payload on the host.
#[cfg(feature = "std")]
fn invoke(case: &TestCase) -> Result<(), Failure> {
    CATCHING.with(|catching| catching.set(true));
    let outcome = std::panic::catch_unwind(|| case.run());
    CATCHING.with(|catching| catching.set(false));
    outcome.unwrap_or_else(|payload| Err(Failure::from_panic(payload.as_ref())))
}

#[cfg(not(feature = "std"))]
fn invoke(case: &TestCase) -> Result<(), Failure> {
    case.run()
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Runs every case in `registry` in order and halts. Never returns.
///
/// Outside a test build this reports the misuse and halts with
/// [`Terminal::Misuse`] before touching any case.
pub fn run_tests(
    registry: Registry,
    channel: &mut dyn Channel,
    halt: &mut dyn Halt,
    config: HarnessConfig,
) -> ! {
    if config.build_mode() != BuildMode::Test {
        Reporter::new(channel, config.use_colors).misuse();
        halt.halt(Terminal::Misuse)
    }
    Runner::new(registry, channel, config).run(halt)
}

/// Reports a panic raised while the runner was active and halts.
///
/// Call this from the firmware's `#[panic_handler]`:
///
/// ```ignore
/// #[panic_handler]
/// fn panic(info: &core::panic::PanicInfo) -> ! {
///     let mut uart = FmtChannel(board::uart());
///     ontarget::runner::report_panic(info, &mut uart, &mut Spin, true)
/// }
/// ```
pub fn report_panic(
    info: &core::panic::PanicInfo<'_>,
    channel: &mut dyn Channel,
    halt: &mut dyn Halt,
    use_colors: bool,
) -> ! {
    report_fatal(active_case(), &info.message(), channel, halt, use_colors)
}

/// Reports a fatal failure against `case` (or against no case) and halts with
/// [`Terminal::Aborted`]. Only the first call reports; later calls halt silently.
pub fn report_fatal(
    case: Option<&TestCase>,
    message: &dyn fmt::Display,
    channel: &mut dyn Channel,
    halt: &mut dyn Halt,
    use_colors: bool,
) -> ! {
    report_once(&FAILURE_LATCH, case, message, channel, halt, use_colors)
}

fn report_once(
    latch: &AtomicBool,
    case: Option<&TestCase>,
    message: &dyn fmt::Display,
    channel: &mut dyn Channel,
    halt: &mut dyn Halt,
    use_colors: bool,
) -> ! {
    if latch.load(Ordering::Acquire) {
        halt.halt(Terminal::Aborted)
    }
    latch.store(true, Ordering::Release);
    let mut reporter = Reporter::new(channel, use_colors);
    match case {
        Some(case) => reporter.failed(case.name(), message),
        None => reporter.fatal(message),
    }
    halt.halt(Terminal::Aborted)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use super::*;
    use crate::equality::{assert_equal, check_equal};
    use crate::report::host::Transcript;
    use crate::runner::sim::Unwind;

    fn passes() -> Result<(), Failure> {
        check_equal(&[1u8, 2], &[1u8, 2])?;
        Ok(())
    }

    fn returns_mismatch() -> Result<(), Failure> {
        check_equal(&3u32, &4u32)?;
        Ok(())
    }

    fn asserts() {
        assert_equal(Some(1i8), None);
    }

    fn inside_runner() {
        assert!(catching_failures());
    }

    fn names_itself() {
        assert_eq!(active_case().map(TestCase::name), Some("names_itself"));
    }

    crate::test_suite! {
        static MIXED = [passes, returns_mismatch, passes];
    }

    crate::test_suite! {
        static ASSERTING = [asserts];
    }

    crate::test_suite! {
        static SLOT = [names_itself];
    }

    crate::test_suite! {
        static EMPTY = [];
    }

    crate::test_suite! {
        static CATCHING_BODY = [inside_runner];
    }

    static SLOT_LOCK: Mutex<()> = Mutex::new(());

    /// Serializes tests that run cases, since they share the active-case slot.
    pub(super) fn exclusive() -> MutexGuard<'static, ()> {
        SLOT_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn quiet() -> HarnessConfig {
        HarnessConfig::new().with_colors(false)
    }

    #[test]
    fn test_step_walks_the_state_machine() {
        let _slot = exclusive();
        let mut transcript = Transcript::new();
        let mut runner = Runner::new(MIXED, &mut transcript, quiet());
        assert_eq!(runner.state(), RunnerState::NotStarted);
        assert_eq!(runner.step(), RunnerState::Running(0));
        assert_eq!(runner.step(), RunnerState::Running(1));
        assert_eq!(runner.step(), RunnerState::Aborted);
        assert_eq!(runner.step(), RunnerState::Aborted);
        assert_eq!(runner.passed(), 1);
        drop(runner);
        assert_eq!(
            transcript.as_str(),
            "running 3 tests\n\
             running passes... ok\n\
             running returns_mismatch... error\n\
             test returns_mismatch failed: expected 3, found 4\n"
        );
    }

    #[test]
    fn test_empty_registry_passes_immediately() {
        let _slot = exclusive();
        let mut transcript = Transcript::new();
        let mut runner = Runner::new(EMPTY, &mut transcript, quiet().with_banner(false));
        assert_eq!(runner.step(), RunnerState::Running(0));
        assert_eq!(runner.step(), RunnerState::AllPassed);
        assert_eq!(runner.state().terminal(), Some(Terminal::AllPassed));
        drop(runner);
        assert_eq!(transcript.as_str(), "test result: ok. 0 passed\n");
    }

    #[test]
    fn test_asserting_body_aborts_with_diagnostic() {
        let _slot = exclusive();
        let mut transcript = Transcript::new();
        let mut runner = Runner::new(ASSERTING, &mut transcript, quiet().with_banner(false));
        runner.step();
        assert_eq!(runner.step(), RunnerState::Aborted);
        drop(runner);
        assert!(transcript
            .as_str()
            .ends_with("test asserts failed: expected 1, found absent\n"));
    }

    #[test]
    fn test_active_case_is_visible_to_the_body() {
        let _slot = exclusive();
        let mut transcript = Transcript::new();
        let mut runner = Runner::new(SLOT, &mut transcript, quiet());
        runner.step();
        assert_eq!(runner.step(), RunnerState::Running(1));
        assert!(active_case().is_none());
    }

    #[test]
    fn test_body_failures_are_caught_without_the_panic_hook() {
        let mut transcript = Transcript::new();
        let mut runner = Runner::new(CATCHING_BODY, &mut transcript, quiet());
        runner.step();
        assert_eq!(runner.step(), RunnerState::Running(1));
        assert!(!catching_failures());
    }

    #[test]
    fn test_idle_calls_the_hook_forever() {
        let mut calls = 0;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            Idle(|| {
                calls += 1;
                if calls == 3 {
                    panic!("woken");
                }
            })
            .halt(Terminal::AllPassed);
        }));
        assert!(outcome.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Terminal::AllPassed.exit_code(), 0);
        assert_eq!(Terminal::Aborted.exit_code(), 1);
        assert_eq!(Terminal::Misuse.exit_code(), 2);
    }

    fn halted_with(outcome: std::thread::Result<()>) -> Terminal {
        *outcome
            .unwrap_err()
            .downcast::<Terminal>()
            .expect("halt payload")
    }

    #[test]
    fn test_fatal_report_is_latched() {
        let latch = AtomicBool::new(false);
        let case = MIXED.get(1).unwrap();
        let mut transcript = Transcript::new();

        let first = panic::catch_unwind(AssertUnwindSafe(|| {
            report_once(&latch, Some(case), &"boom", &mut transcript, &mut Unwind, false);
        }));
        assert_eq!(halted_with(first), Terminal::Aborted);

        let second = panic::catch_unwind(AssertUnwindSafe(|| {
            report_once(&latch, None, &"again", &mut transcript, &mut Unwind, false);
        }));
        assert_eq!(halted_with(second), Terminal::Aborted);

        assert_eq!(
            transcript.as_str(),
            "error\ntest returns_mismatch failed: boom\n"
        );
    }

    #[test]
    fn test_fatal_report_without_a_case() {
        let latch = AtomicBool::new(false);
        let mut transcript = Transcript::new();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            report_once(&latch, None, &"stack overflow", &mut transcript, &mut Unwind, false);
        }));
        assert_eq!(halted_with(outcome), Terminal::Aborted);
        assert_eq!(transcript.as_str(), "error: stack overflow\n");
    }
}
