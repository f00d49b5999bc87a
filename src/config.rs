//! Runner configuration.

/// Whether the image was built to run tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Test,
    Release,
}

impl BuildMode {
    /// `Test` when the `test-mode` feature is enabled (or under `cargo test`).
    pub const fn current() -> Self {
        if cfg!(any(test, feature = "test-mode")) {
            BuildMode::Test
        } else {
            BuildMode::Release
        }
    }
}

/// When to colour the status markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn resolve(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => terminal_supports_color(),
        }
    }
}

#[cfg(feature = "std")]
fn terminal_supports_color() -> bool {
    atty::is(atty::Stream::Stdout)
}

// Serial consoles on the bench pass escape codes through to a terminal emulator.
#[cfg(not(feature = "std"))]
fn terminal_supports_color() -> bool {
    true
}

/// Configuration for a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    pub use_colors: bool,
    build_mode: BuildMode,
    /// Print `running N tests` before the first case.
    pub banner: bool,
}

impl HarnessConfig {
    /// Colours on, build mode from the current features, banner on.
    pub const fn new() -> Self {
        Self {
            use_colors: true,
            build_mode: BuildMode::current(),
            banner: true,
        }
    }

    pub const fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub const fn build_mode(&self) -> BuildMode {
        self.build_mode
    }

    /// Marks the run as coming from a release image, so the entry point refuses it.
    /// There is no way back to `Test`: only the build decides that.
    pub const fn in_release_build(mut self) -> Self {
        self.build_mode = BuildMode::Release;
        self
    }

    pub const fn with_banner(mut self, banner: bool) -> Self {
        self.banner = banner;
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new().with_colors(ColorMode::Auto.resolve())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_tests_run_in_test_mode() {
        assert_eq!(BuildMode::current(), BuildMode::Test);
        assert_eq!(HarnessConfig::new().build_mode(), BuildMode::Test);
    }

    #[test]
    fn test_explicit_color_modes() {
        assert!(ColorMode::Always.resolve());
        assert!(!ColorMode::Never.resolve());
    }

    #[test]
    fn test_builders() {
        let config = HarnessConfig::new()
            .with_colors(false)
            .with_banner(false)
            .in_release_build();
        assert!(!config.use_colors);
        assert!(!config.banner);
        assert_eq!(config.build_mode(), BuildMode::Release);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_host_binary_builds_are_test_builds() {
        assert!(cfg!(feature = "test-mode"));
    }
}
