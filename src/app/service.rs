//! Monitor loop — the hexagonal core.
//!
//! [`MonitorLoop`] owns the thresholds, the actuator, the optional
//! telemetry reporter and the pacing delay.  Samples arrive through the
//! shared [`SampleSlot`]; all I/O flows through port traits, so the whole
//! loop runs against mocks on the host.
//!
//! ```text
//!                  ┌──────────────────────────────┐ ──▶ IndicatorPort
//!  SampleSlot ───▶ │          MonitorLoop         │
//!                  │ classify · actuate · report  │ ──▶ SerialPort
//!                  └──────────────────────────────┘ ──▶ EventSink
//! ```
//!
//! ## States
//!
//! * **Idle** — spinning until the slot holds a fresh reading.
//! * **Processing** — classify → actuate → report → pace, then hand the
//!   slot back to the trigger and return to Idle.
//!
//! There is no terminal state.  [`run`](MonitorLoop::run) only returns
//! when the [`StopFlag`] is raised.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::classifier::{Classification, Thresholds};
use crate::config::{ConfigError, MonitorConfig};
use crate::drivers::pacing::Pacer;
use crate::events::{Reading, SampleSlot, StopFlag};
use crate::telemetry::{TelemetryLine, TelemetryReporter};

use super::actuator::{Actuator, OutputPattern};
use super::events::{MonitorEvent, RunStats};
use super::ports::{EventSink, IndicatorPort, SerialPort, WatchdogPort};

/// Foreground loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Processing,
}

/// Result of one processed sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub reading: Reading,
    pub classification: Classification,
    pub pattern: OutputPattern,
    /// `None` when telemetry is disabled or the write failed.
    pub line: Option<TelemetryLine>,
}

pub struct MonitorLoop<'a, I, S, D>
where
    I: IndicatorPort,
    S: SerialPort,
    D: DelayNs,
{
    slot: &'a SampleSlot,
    thresholds: Thresholds,
    actuator: Actuator<I>,
    reporter: Option<TelemetryReporter<S>>,
    pacer: Pacer<D>,
    state: LoopState,
    last: Option<Classification>,
    cycles: u64,
}

impl<'a, I, S, D> MonitorLoop<'a, I, S, D>
where
    I: IndicatorPort,
    S: SerialPort,
    D: DelayNs,
{
    /// Build the loop.  The configuration is validated here so a bad
    /// threshold pair fails at boot, before any sample is classified.
    ///
    /// `serial` is ignored when telemetry is disabled in `config`, and
    /// required when it is enabled.
    pub fn new(
        config: &MonitorConfig,
        slot: &'a SampleSlot,
        indicators: I,
        serial: Option<S>,
        delay: D,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let thresholds = config.thresholds()?;
        if config.telemetry_enabled && serial.is_none() {
            return Err(ConfigError::MissingSerial);
        }
        let reporter = serial
            .filter(|_| config.telemetry_enabled)
            .map(TelemetryReporter::new);

        Ok(Self {
            slot,
            thresholds,
            actuator: Actuator::new(indicators),
            reporter,
            pacer: Pacer::new(delay, config.pacing_delay()),
            state: LoopState::Idle,
            last: None,
            cycles: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run until `stop` is raised.  The flag is checked and `watchdog`
    /// fed once per iteration; an iteration is either one idle spin or one
    /// full cycle.
    pub fn run(
        &mut self,
        stop: &StopFlag,
        sink: &mut impl EventSink,
        watchdog: &mut impl WatchdogPort,
    ) -> RunStats {
        sink.emit(&MonitorEvent::Started {
            over: self.thresholds.over(),
            under: self.thresholds.under(),
        });
        info!(
            "Monitor loop running (over={}, under={}, telemetry={})",
            self.thresholds.over(),
            self.thresholds.under(),
            self.reporter.is_some()
        );

        while !stop.is_stop_requested() {
            watchdog.feed();
            if self.poll(sink).is_none() {
                core::hint::spin_loop();
            }
        }

        self.actuator.all_off();
        let stats = self.stats();
        sink.emit(&MonitorEvent::Stopped(stats));
        stats
    }

    // ── Per-sample orchestration ──────────────────────────────

    /// One loop iteration.  Returns `None` when no fresh reading was
    /// waiting (the loop stays Idle).
    pub fn poll(&mut self, sink: &mut impl EventSink) -> Option<Cycle> {
        let reading = self.slot.take()?;
        self.state = LoopState::Processing;

        let cycle = self.process(reading, sink);

        self.pacer.pace();
        self.slot.release();
        self.state = LoopState::Idle;
        Some(cycle)
    }

    fn process(&mut self, reading: Reading, sink: &mut impl EventSink) -> Cycle {
        self.cycles += 1;

        // 1. Classify
        let classification = self.thresholds.classify(reading);

        // 2. Actuate
        let pattern = self.actuator.apply(classification);

        // 3. Report
        let line = match self.reporter.as_mut() {
            Some(reporter) => match reporter.report(classification, reading) {
                Ok(line) => Some(line),
                Err(e) => {
                    sink.emit(&MonitorEvent::TelemetryFailed(e));
                    None
                }
            },
            None => None,
        };

        if self.last != Some(classification) {
            sink.emit(&MonitorEvent::ClassificationChanged {
                from: self.last,
                to: classification,
                reading,
            });
            self.last = Some(classification);
        }
        debug!("cycle {} | raw={} -> {:?}", self.cycles, reading, classification);

        Cycle {
            reading,
            classification,
            pattern,
            line,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Classification of the most recent cycle.
    pub fn last_classification(&self) -> Option<Classification> {
        self.last
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            cycles: self.cycles,
            completed: self.slot.completed(),
            missed: self.slot.missed(),
        }
    }

    pub fn reporter(&self) -> Option<&TelemetryReporter<S>> {
        self.reporter.as_ref()
    }
}
