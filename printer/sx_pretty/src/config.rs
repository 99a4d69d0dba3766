//! Printer configuration.
//!
//! A `PrintConfig` is read once at stream construction; changing it later
//! has no effect on streams already built from it.

/// Fallback right margin when none is configured.
pub const DEFAULT_RIGHT_MARGIN: usize = 80;

/// Layout parameters for a pretty stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintConfig {
    /// Target line length in columns.
    pub right_margin: usize,
    /// Width threshold below which miser mode activates.
    pub miser_width: Option<usize>,
    /// Budget for total emitted lines; output is truncated with ` ..` when
    /// it is exhausted.
    pub lines: Option<usize>,
    /// Disables line-budget truncation (output must read back).
    pub readably: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            right_margin: DEFAULT_RIGHT_MARGIN,
            miser_width: None,
            lines: None,
            readably: false,
        }
    }
}

impl PrintConfig {
    /// Default configuration with the given right margin.
    pub fn with_right_margin(right_margin: usize) -> Self {
        PrintConfig {
            right_margin,
            ..PrintConfig::default()
        }
    }
}
