//! Host-side channels: an in-memory transcript and a terminal.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::{Channel, Style};
use crate::config::ColorMode;

/// Collects everything written into a `String`, for tests and simulation.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    buffer: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl Channel for Transcript {
    fn write_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Writes to stdout, colouring markers through termcolor.
pub struct TermChannel {
    stream: StandardStream,
}

impl TermChannel {
    pub fn stdout(mode: ColorMode) -> Self {
        let choice = if mode.resolve() {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self {
            stream: StandardStream::stdout(choice),
        }
    }

    fn try_styled(&mut self, style: Style, text: &str) -> io::Result<()> {
        let color = match style {
            Style::Ok => Color::Green,
            Style::Error => Color::Red,
        };
        self.stream
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        self.stream.write_all(text.as_bytes())?;
        self.stream.reset()?;
        self.stream.flush()
    }
}

impl Channel for TermChannel {
    fn write_str(&mut self, text: &str) {
        // Flush every write so "running <name>... " is visible while the body runs.
        let _ = self
            .stream
            .write_all(text.as_bytes())
            .and_then(|()| self.stream.flush());
    }

    fn styled(&mut self, style: Style, text: &str) {
        let _ = self.try_styled(style, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Reporter;

    #[test]
    fn test_transcript_collects_writes() {
        let mut transcript = Transcript::new();
        {
            let mut reporter = Reporter::new(&mut transcript, false);
            reporter.banner(2);
            reporter.running("uart::echo");
            reporter.ok();
        }
        assert_eq!(
            transcript.as_str(),
            "running 2 tests\nrunning uart::echo... ok\n"
        );
    }
}
