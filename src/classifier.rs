//! Threshold classifier.
//!
//! Maps a raw ADC reading onto one of three supply states.  The rule is
//! evaluated top to bottom and the first match wins:
//!
//! | Condition              | Result   |
//! |------------------------|----------|
//! | `reading >= over`      | `Over`   |
//! | `reading <= under`     | `Under`  |
//! | otherwise              | `Normal` |
//!
//! There is no hysteresis.  A reading sitting exactly on a threshold always
//! lands on the same side: equality with `over` is `Over`, equality with
//! `under` is `Under`.

use crate::config::ConfigError;
use crate::events::Reading;

/// Supply state derived from a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Under,
    Normal,
    Over,
}

impl Classification {
    /// Every variant, in table order.
    pub const ALL: [Classification; 3] = [Self::Under, Self::Normal, Self::Over];

    /// Human-readable label used on the serial line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Over => "Overvoltage Detected",
            Self::Under => "Undervoltage Detected",
            Self::Normal => "Voltage Normal",
        }
    }

    /// Position of this variant in [`Classification::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Classify `reading` against the two thresholds.
pub const fn classify(reading: Reading, over: Reading, under: Reading) -> Classification {
    if reading >= over {
        Classification::Over
    } else if reading <= under {
        Classification::Under
    } else {
        Classification::Normal
    }
}

/// A validated `(over, under)` threshold pair.
///
/// Construction enforces `under < over`, so a `Thresholds` value can never
/// misclassify because of swapped bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    over: Reading,
    under: Reading,
}

impl Thresholds {
    pub fn new(over: Reading, under: Reading) -> Result<Self, ConfigError> {
        if under >= over {
            return Err(ConfigError::ThresholdOrder { under, over });
        }
        Ok(Self { over, under })
    }

    pub fn over(&self) -> Reading {
        self.over
    }

    pub fn under(&self) -> Reading {
        self.under
    }

    pub fn classify(&self, reading: Reading) -> Classification {
        classify(reading, self.over, self.under)
    }
}
