//! Serial telemetry line.
//!
//! One line per processed sample:
//!
//! ```text
//! Overvoltage Detected: 4095\r\n
//! Voltage Normal: 0\r\n
//! ```
//!
//! The line is built in a fixed-capacity stack buffer and handed to the
//! [`SerialPort`] in a single blocking write, so two lines can never
//! interleave on the wire.

use core::fmt::Write;

use crate::app::ports::{SerialError, SerialPort};
use crate::classifier::Classification;
use crate::events::Reading;

/// Longest label (21) + ": " + five digits + "\r\n", rounded up.
pub const LINE_CAP: usize = 32;

/// Line terminator on the wire.
pub const LINE_END: &str = "\r\n";

/// A formatted status line, terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryLine {
    buf: heapless::String<LINE_CAP>,
}

impl TelemetryLine {
    pub fn new(classification: Classification, reading: Reading) -> Self {
        let mut buf = heapless::String::new();
        // Cannot overflow: LINE_CAP covers the longest label with u16::MAX.
        let _ = write!(buf, "{}: {}{}", classification.label(), reading, LINE_END);
        Self { buf }
    }

    /// The line without its terminator.
    pub fn text(&self) -> &str {
        self.buf.strip_suffix(LINE_END).unwrap_or(self.buf.as_str())
    }

    /// Bytes as transmitted, terminator included.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }
}

/// Formats readings and pushes them to a blocking serial port.
pub struct TelemetryReporter<S: SerialPort> {
    port: S,
    lines_sent: u32,
}

impl<S: SerialPort> TelemetryReporter<S> {
    pub fn new(port: S) -> Self {
        Self { port, lines_sent: 0 }
    }

    /// Build and transmit one line.  Blocks until the port has accepted
    /// the whole line.
    pub fn report(
        &mut self,
        classification: Classification,
        reading: Reading,
    ) -> Result<TelemetryLine, SerialError> {
        let line = TelemetryLine::new(classification, reading);
        self.port.write_line(line.as_bytes())?;
        self.lines_sent = self.lines_sent.wrapping_add(1);
        Ok(line)
    }

    pub fn lines_sent(&self) -> u32 {
        self.lines_sent
    }

    pub fn port(&self) -> &S {
        &self.port
    }
}
