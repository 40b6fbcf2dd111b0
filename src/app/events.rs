//! Outbound monitor events.
//!
//! The [`MonitorLoop`](super::service::MonitorLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::classifier::Classification;
use crate::events::Reading;

use super::ports::SerialError;

/// Structured events emitted by the monitor core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// The loop started with these thresholds.
    Started { over: Reading, under: Reading },

    /// The classification differs from the previous cycle's.
    /// `from` is `None` on the first processed sample.
    ClassificationChanged {
        from: Option<Classification>,
        to: Classification,
        reading: Reading,
    },

    /// The status line could not be transmitted.
    TelemetryFailed(SerialError),

    /// The stop flag was observed; carries run statistics.
    Stopped(RunStats),
}

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Samples that went through classify → actuate → report.
    pub cycles: u64,
    /// Conversions published by the acquirer.
    pub completed: u32,
    /// Triggers dropped because a sample was still in flight.
    pub missed: u32,
}
