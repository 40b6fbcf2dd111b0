//! System configuration parameters
//!
//! All tunable parameters for the VoltWatch monitor.  Values are fixed at
//! build time: the defaults below are the reference calibration, and a JSON
//! override can be baked in through the `VOLTWATCH_CONFIG` environment
//! variable (see `main.rs`).  Nothing is persisted at runtime.

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classifier::Thresholds;
use crate::drivers::hw_timer;

/// Highest ADC1 channel index on the ESP32-S3.
pub const MAX_ADC_CHANNEL: u8 = 9;

/// Supported converter resolutions (bits).
pub const MIN_RESOLUTION_BITS: u8 = 8;
pub const MAX_RESOLUTION_BITS: u8 = 16;

/// Sample interval bounds (milliseconds).
pub const MIN_SAMPLE_INTERVAL_MS: u32 = 1;
pub const MAX_SAMPLE_INTERVAL_MS: u32 = 60_000;

/// Longest permitted pacing delay (milliseconds).
pub const MAX_PACING_DELAY_MS: u32 = 10_000;

/// Core monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Thresholds ---
    /// Raw reading at or above which the supply is over-voltage (~2.95 V).
    pub over_threshold: u16,
    /// Raw reading at or below which the supply is under-voltage (~2.58 V).
    pub under_threshold: u16,

    // --- Acquisition ---
    /// ADC1 channel sampled by the monitor.
    pub adc_channel: u8,
    /// Converter resolution in bits (12 → 0..=4095).
    pub adc_resolution_bits: u8,

    // --- Timing ---
    /// Period of the sample trigger (milliseconds).
    pub sample_interval_ms: u32,
    /// Clock feeding the trigger timer (Hz).  `esp_timer` ticks at 1 MHz.
    pub timer_clock_hz: u32,
    /// Busy-wait after each processed sample (milliseconds).
    pub pacing_delay_ms: u32,

    // --- Telemetry ---
    /// Emit a status line on the serial port every cycle.
    pub telemetry_enabled: bool,
    /// Telemetry UART baud rate.
    pub uart_baud: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Thresholds
            over_threshold: 3661,
            under_threshold: 3201,

            // Acquisition
            adc_channel: 4, // ADC1_CH4 = GPIO5
            adc_resolution_bits: 12,

            // Timing
            sample_interval_ms: 10, // 100 Hz
            timer_clock_hz: 1_000_000,
            pacing_delay_ms: 50,

            // Telemetry
            telemetry_enabled: true,
            uart_baud: 115_200,
        }
    }
}

impl MonitorConfig {
    /// Parse a JSON override.  Missing fields fall back to the defaults.
    /// The result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant.  Called before any peripheral is touched so a
    /// bad configuration fails at boot instead of misclassifying later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_RESOLUTION_BITS..=MAX_RESOLUTION_BITS).contains(&self.adc_resolution_bits) {
            return Err(ConfigError::Resolution(self.adc_resolution_bits));
        }
        let max = self.max_reading();
        for threshold in [self.over_threshold, self.under_threshold] {
            if threshold > max {
                return Err(ConfigError::ThresholdOutOfRange { threshold, max });
            }
        }
        Thresholds::new(self.over_threshold, self.under_threshold)?;

        if self.adc_channel > MAX_ADC_CHANNEL {
            return Err(ConfigError::Channel(self.adc_channel));
        }
        if !(MIN_SAMPLE_INTERVAL_MS..=MAX_SAMPLE_INTERVAL_MS).contains(&self.sample_interval_ms) {
            return Err(ConfigError::Interval(self.sample_interval_ms));
        }
        hw_timer::reload_count(self.timer_clock_hz, self.sample_interval())?;

        if self.pacing_delay_ms > MAX_PACING_DELAY_MS {
            return Err(ConfigError::PacingDelay(self.pacing_delay_ms));
        }
        if self.telemetry_enabled && self.uart_baud == 0 {
            return Err(ConfigError::BaudRate);
        }
        Ok(())
    }

    /// Largest value the converter can produce.
    pub fn max_reading(&self) -> u16 {
        let bits = self.adc_resolution_bits.min(MAX_RESOLUTION_BITS);
        ((1u32 << bits) - 1) as u16
    }

    /// Validated threshold pair.
    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        Thresholds::new(self.over_threshold, self.under_threshold)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.sample_interval_ms))
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.pacing_delay_ms))
    }
}

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

/// Reasons a configuration is rejected at initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `under < over` does not hold.
    ThresholdOrder { under: u16, over: u16 },
    /// A threshold lies outside the converter's sample range.
    ThresholdOutOfRange { threshold: u16, max: u16 },
    /// Unsupported converter resolution.
    Resolution(u8),
    /// ADC channel does not exist.
    Channel(u8),
    /// Sample interval out of range (milliseconds).
    Interval(u32),
    /// Timer clock is zero or the reload count does not fit the timer.
    Reload,
    /// Pacing delay out of range (milliseconds).
    PacingDelay(u32),
    /// Telemetry enabled with a zero baud rate.
    BaudRate,
    /// Telemetry enabled but no serial port supplied.
    MissingSerial,
    /// JSON override could not be parsed.
    Parse,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThresholdOrder { under, over } => {
                write!(f, "under threshold {under} must be below over threshold {over}")
            }
            Self::ThresholdOutOfRange { threshold, max } => {
                write!(f, "threshold {threshold} exceeds sample range 0..={max}")
            }
            Self::Resolution(bits) => write!(f, "unsupported ADC resolution {bits} bits"),
            Self::Channel(ch) => write!(f, "ADC channel {ch} out of range"),
            Self::Interval(ms) => write!(f, "sample interval {ms} ms out of range"),
            Self::Reload => write!(f, "timer reload count out of range"),
            Self::PacingDelay(ms) => write!(f, "pacing delay {ms} ms out of range"),
            Self::BaudRate => write!(f, "telemetry baud rate must be non-zero"),
            Self::MissingSerial => write!(f, "telemetry enabled without a serial port"),
            Self::Parse => write!(f, "config JSON could not be parsed"),
        }
    }
}
