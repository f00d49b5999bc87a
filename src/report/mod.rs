//! Progress and failure reporting over the diagnostic channel.
//!
//! The channel is whatever narrow, write-only transport the target exposes (a UART,
//! semihosting, an RTT buffer). It is written fire-and-forget: nothing here waits on
//! it or reads from it.

use core::fmt;

#[cfg(feature = "std")]
pub mod host;

// ============================================================================
// CHANNEL: the write-only transport the reporter prints through
// ============================================================================

const RESET: &str = "\x1b[0m";

/// Styling applied to status markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Success markers (green).
    Ok,
    /// Failure markers (red).
    Error,
}

impl Style {
    pub const fn ansi(self) -> &'static str {
        match self {
            Style::Ok => "\x1b[32m",
            Style::Error => "\x1b[31m",
        }
    }
}

/// A write-only text sink.
pub trait Channel {
    fn write_str(&mut self, text: &str);

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        let _ = fmt::write(&mut ChannelWriter(self), args);
    }

    /// Writes `text` in `style`. The default embeds ANSI escape sequences, which
    /// the transport passes through untouched.
    fn styled(&mut self, style: Style, text: &str) {
        self.write_str(style.ansi());
        self.write_str(text);
        self.write_str(RESET);
    }
}

struct ChannelWriter<'c, C: Channel + ?Sized>(&'c mut C);

impl<C: Channel + ?Sized> fmt::Write for ChannelWriter<'_, C> {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        self.0.write_str(text);
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullChannel;

impl Channel for NullChannel {
    fn write_str(&mut self, _text: &str) {}
}

/// Adapts any `core::fmt::Write` implementor, such as a HAL serial port.
/// Write errors are dropped: the channel has no backpressure contract.
#[derive(Debug, Default)]
pub struct FmtChannel<W>(pub W);

impl<W> FmtChannel<W> {
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: fmt::Write> Channel for FmtChannel<W> {
    fn write_str(&mut self, text: &str) {
        let _ = self.0.write_str(text);
    }
}

// ============================================================================
// REPORTER: runner-facing formatting over a channel
// ============================================================================

/// Formats the runner's markers onto a [`Channel`].
pub struct Reporter<'c> {
    channel: &'c mut dyn Channel,
    use_colors: bool,
}

impl<'c> Reporter<'c> {
    pub fn new(channel: &'c mut dyn Channel, use_colors: bool) -> Self {
        Self {
            channel,
            use_colors,
        }
    }

    /// Writes formatted text.
    pub fn print(&mut self, args: fmt::Arguments<'_>) {
        self.channel.write_fmt(args);
    }

    /// Writes formatted text followed by a line break.
    pub fn println(&mut self, args: fmt::Arguments<'_>) {
        self.channel.write_fmt(args);
        self.channel.write_str("\n");
    }

    fn marker(&mut self, style: Style, text: &str) {
        if self.use_colors {
            self.channel.styled(style, text);
        } else {
            self.channel.write_str(text);
        }
    }

    pub fn banner(&mut self, total: usize) {
        let noun = if total == 1 { "test" } else { "tests" };
        self.println(format_args!("running {total} {noun}"));
    }

    pub fn running(&mut self, name: &str) {
        self.print(format_args!("running {name}... "));
    }

    pub fn ok(&mut self) {
        self.marker(Style::Ok, "ok");
        self.channel.write_str("\n");
    }

    /// Reports the failing case and its diagnostic.
    pub fn failed(&mut self, name: &str, diagnostic: &dyn fmt::Display) {
        self.marker(Style::Error, "error");
        self.channel.write_str("\n");
        self.println(format_args!("test {name} failed: {diagnostic}"));
    }

    /// Reports a fatal failure raised while no case was running.
    pub fn fatal(&mut self, diagnostic: &dyn fmt::Display) {
        self.marker(Style::Error, "error");
        self.println(format_args!(": {diagnostic}"));
    }

    pub fn summary(&mut self, passed: usize) {
        self.print(format_args!("test result: "));
        self.marker(Style::Ok, "ok");
        self.println(format_args!(". {passed} passed"));
    }

    pub fn misuse(&mut self) {
        self.marker(Style::Error, "error");
        self.println(format_args!(": {}", crate::errors::HarnessError::Misuse));
    }
}
