//! Classification → indicator pattern mapping.
//!
//! The indicator bank has three lines (one RGB LED, one colour per state).
//! Each classification lights exactly one line; every other line is
//! driven low on each write, so indicators never accumulate.
//!
//! | Classification | Line        | Pattern  |
//! |----------------|-------------|----------|
//! | `Over`         | red         | `0b001`  |
//! | `Under`        | blue        | `0b010`  |
//! | `Normal`       | green       | `0b100`  |

use crate::classifier::Classification;

use super::ports::IndicatorPort;

/// Number of indicator lines in the bank.
pub const INDICATOR_LINES: usize = 3;

pub const LINE_OVER: u8 = 0;
pub const LINE_UNDER: u8 = 1;
pub const LINE_NORMAL: u8 = 2;

/// Bitset of indicator lines; bit `n` drives line `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OutputPattern(u8);

impl OutputPattern {
    pub const OFF: Self = Self(0);

    pub const fn line(line: u8) -> Self {
        Self(1 << line)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_set(self, line: u8) -> bool {
        self.0 & (1 << line) != 0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// Static mapping, indexed by [`Classification::index`].
pub const PATTERN_TABLE: [OutputPattern; 3] = [
    OutputPattern::line(LINE_UNDER),  // Under
    OutputPattern::line(LINE_NORMAL), // Normal
    OutputPattern::line(LINE_OVER),   // Over
];

/// Pattern for a classification.
pub const fn pattern_for(classification: Classification) -> OutputPattern {
    PATTERN_TABLE[classification.index()]
}

/// Drives the indicator port from classifications.
pub struct Actuator<I: IndicatorPort> {
    port: I,
    current: OutputPattern,
}

impl<I: IndicatorPort> Actuator<I> {
    /// Wrap the port and drive every line low.
    pub fn new(mut port: I) -> Self {
        port.write_pattern(OutputPattern::OFF);
        Self {
            port,
            current: OutputPattern::OFF,
        }
    }

    /// Look up the pattern for `classification` and write it.
    pub fn apply(&mut self, classification: Classification) -> OutputPattern {
        let pattern = pattern_for(classification);
        self.port.write_pattern(pattern);
        self.current = pattern;
        pattern
    }

    /// Drive every line low.
    pub fn all_off(&mut self) {
        self.port.write_pattern(OutputPattern::OFF);
        self.current = OutputPattern::OFF;
    }

    /// Last pattern written.
    pub fn current(&self) -> OutputPattern {
        self.current
    }

    pub fn port(&self) -> &I {
        &self.port
    }
}
