//! ontarget error handling.
//!
//! Failures have to outlive the comparison that produced them and cross the
//! runner boundary without a heap, so their text is rendered once into a
//! fixed-capacity [`Message`].
//!
//! - [`Failure::Mismatch`]: the equality engine found a structural difference.
//! - [`Failure::Body`]: a test body signalled failure on its own.
//! - [`HarnessError`]: misuse of the entry point and host-side I/O.
//!
//! With the `std` feature every type here is also a `miette::Diagnostic`.

use core::fmt::{self, Write as _};

use thiserror::Error;

use crate::equality::Mismatch;

/// Capacity of a rendered failure message, in bytes.
pub const MESSAGE_CAPACITY: usize = 256;

const TRUNCATION_MARK: &str = "...";

/// Fixed-capacity UTF-8 text. Overlong input is cut on a character boundary and
/// marked with a trailing `...`.
#[derive(Clone, Copy)]
pub struct Message {
    bytes: [u8; MESSAGE_CAPACITY],
    len: usize,
    truncated: bool,
}

impl Message {
    pub const fn new() -> Self {
        Self {
            bytes: [0; MESSAGE_CAPACITY],
            len: 0,
            truncated: false,
        }
    }

    pub fn from_args(args: fmt::Arguments<'_>) -> Self {
        let mut message = Self::new();
        // Writing never fails: overflow truncates instead.
        let _ = message.write_fmt(args);
        message
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for Message {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        let room = MESSAGE_CAPACITY - TRUNCATION_MARK.len() - self.len;
        if text.len() <= room {
            self.bytes[self.len..self.len + text.len()].copy_from_slice(text.as_bytes());
            self.len += text.len();
            return Ok(());
        }
        let mut cut = room;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        let kept = &text.as_bytes()[..cut];
        self.bytes[self.len..self.len + cut].copy_from_slice(kept);
        self.len += cut;
        let mark = TRUNCATION_MARK.as_bytes();
        self.bytes[self.len..self.len + mark.len()].copy_from_slice(mark);
        self.len += mark.len();
        self.truncated = true;
        Ok(())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Message {}

/// Why a test case failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "std", derive(miette::Diagnostic))]
pub enum Failure {
    #[error("{0}")]
    #[cfg_attr(feature = "std", diagnostic(code(ontarget::mismatch)))]
    Mismatch(Message),

    #[error("{0}")]
    #[cfg_attr(
        feature = "std",
        diagnostic(
            code(ontarget::body),
            help("the test body returned an error before any comparison failed")
        )
    )]
    Body(Message),
}

impl Failure {
    /// A failure signalled by the test body itself, described by `error`'s `Debug` output.
    pub fn body<E: fmt::Debug>(error: E) -> Self {
        Failure::Body(Message::from_args(format_args!("{error:?}")))
    }

    /// A failure signalled by the test body with a plain reason.
    pub fn reason(text: &str) -> Self {
        Failure::Body(Message::from_args(format_args!("{text}")))
    }

    pub fn message(&self) -> &Message {
        match self {
            Failure::Mismatch(message) | Failure::Body(message) => message,
        }
    }

    /// Turns an unwinding payload caught around a test body into a failure.
    #[cfg(feature = "std")]
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        if let Some(failure) = payload.downcast_ref::<Failure>() {
            return *failure;
        }
        if let Some(text) = payload.downcast_ref::<&'static str>() {
            return Failure::Body(Message::from_args(format_args!("panicked: {text}")));
        }
        if let Some(text) = payload.downcast_ref::<String>() {
            return Failure::Body(Message::from_args(format_args!("panicked: {text}")));
        }
        Failure::Body(Message::from_args(format_args!("panicked")))
    }
}

impl From<Mismatch<'_>> for Failure {
    fn from(mismatch: Mismatch<'_>) -> Self {
        Failure::Mismatch(Message::from_args(format_args!("{mismatch}")))
    }
}

/// Errors outside of test outcomes.
#[derive(Debug, Error)]
#[cfg_attr(feature = "std", derive(miette::Diagnostic))]
pub enum HarnessError {
    #[error("test runner invoked outside a test build")]
    #[cfg_attr(
        feature = "std",
        diagnostic(
            code(ontarget::misuse),
            help("build the test image with the `test-mode` feature enabled")
        )
    )]
    Misuse,

    #[cfg(feature = "std")]
    #[error("failed to write to the diagnostic channel")]
    #[diagnostic(code(ontarget::io))]
    Io(#[from] std::io::Error),
}
