//! Mock hardware adapters for integration tests.
//!
//! Records every indicator write and every serial line so tests can assert
//! on the full output history without touching real GPIO or UART
//! registers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use voltwatch::app::actuator::OutputPattern;
use voltwatch::app::events::MonitorEvent;
use voltwatch::app::ports::{
    ConversionError, ConversionPort, EventSink, IndicatorPort, SerialError, SerialPort,
};
use voltwatch::events::Reading;

// ── MockIndicators ────────────────────────────────────────────

/// Indicator bank that keeps every pattern it was asked to show.
/// The history is shared so a test can inspect it while the loop owns
/// the port.
#[derive(Clone, Default)]
pub struct MockIndicators {
    pub writes: Arc<Mutex<Vec<OutputPattern>>>,
}

#[allow(dead_code)]
impl MockIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<OutputPattern> {
        self.writes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<OutputPattern> {
        self.writes.lock().unwrap().last().copied()
    }
}

impl IndicatorPort for MockIndicators {
    fn write_pattern(&mut self, pattern: OutputPattern) {
        self.writes.lock().unwrap().push(pattern);
    }
}

// ── MockSerial ────────────────────────────────────────────────

/// Captures transmitted bytes.  With `fail_after` set, writes past that
/// count are rejected.
#[derive(Clone, Default)]
pub struct MockSerial {
    pub bytes: Arc<Mutex<Vec<u8>>>,
    fail_after: Option<usize>,
    writes: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(writes: usize) -> Self {
        Self {
            fail_after: Some(writes),
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.bytes.lock().unwrap().clone()).unwrap()
    }

    /// Transmitted lines with the `\r\n` terminator removed.
    pub fn lines(&self) -> Vec<String> {
        self.text()
            .split_terminator("\r\n")
            .map(str::to_owned)
            .collect()
    }
}

impl SerialPort for MockSerial {
    fn write_line(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        let mut writes = self.writes.lock().unwrap();
        if self.fail_after.is_some_and(|limit| *writes >= limit) {
            return Err(SerialError::WriteFailed(-1));
        }
        *writes += 1;
        self.bytes.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }
}

// ── ScriptedAdc ───────────────────────────────────────────────

/// Converter that replays a fixed script, then keeps returning the last
/// value.  `None` entries simulate a failed conversion.
pub struct ScriptedAdc {
    script: VecDeque<Option<Reading>>,
    last: Reading,
    pub conversions: usize,
}

#[allow(dead_code)]
impl ScriptedAdc {
    pub fn new(script: impl IntoIterator<Item = Option<Reading>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: 0,
            conversions: 0,
        }
    }

    pub fn readings(readings: &[Reading]) -> Self {
        Self::new(readings.iter().copied().map(Some))
    }
}

impl ConversionPort for ScriptedAdc {
    fn convert(&mut self, channel: u8) -> Result<Reading, ConversionError> {
        self.conversions += 1;
        match self.script.pop_front() {
            Some(Some(raw)) => {
                self.last = raw;
                Ok(raw)
            }
            Some(None) => Err(ConversionError::ChannelNotConfigured(channel)),
            None => Ok(self.last),
        }
    }
}

// ── Delays ────────────────────────────────────────────────────

/// Pacing delay that returns immediately and counts calls.
#[derive(Default)]
pub struct NoDelay {
    pub calls: usize,
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {
        self.calls += 1;
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<MonitorEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn telemetry_failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, MonitorEvent::TelemetryFailed(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &MonitorEvent) {
        self.events.push(event.clone());
    }
}
