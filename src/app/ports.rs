//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorLoop (domain)
//! ```
//!
//! Driven adapters (ADC, indicator GPIOs, UART, event sinks) implement these
//! traits.  The [`MonitorLoop`](super::service::MonitorLoop) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::events::Reading;

use super::actuator::OutputPattern;

// ───────────────────────────────────────────────────────────────
// Conversion port (driven adapter: hardware → acquirer)
// ───────────────────────────────────────────────────────────────

/// One-shot analog conversion on a single channel.
pub trait ConversionPort {
    /// Run one conversion on `channel` and return the raw result.
    fn convert(&mut self, channel: u8) -> Result<Reading, ConversionError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the indicator lines.
pub trait IndicatorPort {
    /// Drive every line in `pattern` high and every other line low.
    fn write_pattern(&mut self, pattern: OutputPattern);
}

// ───────────────────────────────────────────────────────────────
// Serial port (driven adapter: domain → UART)
// ───────────────────────────────────────────────────────────────

/// Blocking line transmitter.
///
/// Implementations MUST either accept every byte or fail; a partial line is
/// never acceptable.  When the transmit buffer is full the call blocks until
/// space frees up.
pub trait SerialPort {
    fn write_line(&mut self, bytes: &[u8]) -> Result<(), SerialError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`MonitorEvent`](super::events::MonitorEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::MonitorEvent);
}

// ───────────────────────────────────────────────────────────────
// Watchdog port (driven adapter: domain → task watchdog)
// ───────────────────────────────────────────────────────────────

/// Liveness signal for a supervisor that resets the device when the
/// foreground loop stops making progress.
pub trait WatchdogPort {
    /// Called once per loop iteration, idle or processing.
    fn feed(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConversionPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    /// The driver returned an error code.
    ReadFailed(i32),
    /// Channel not configured for one-shot reads.
    ChannelNotConfigured(u8),
}

/// Errors from [`SerialPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// The UART driver rejected the write.
    WriteFailed(i32),
    /// Host-side I/O error.
    Io,
}

impl core::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ReadFailed(rc) => write!(f, "ADC read failed (rc={})", rc),
            Self::ChannelNotConfigured(ch) => write!(f, "ADC channel {} not configured", ch),
        }
    }
}

impl core::fmt::Display for SerialError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WriteFailed(rc) => write!(f, "UART write failed (rc={})", rc),
            Self::Io => write!(f, "I/O error"),
        }
    }
}
