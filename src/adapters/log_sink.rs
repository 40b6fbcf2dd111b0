//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured monitor events to the
//! `log` facade (ESP-IDF logger → USB-CDC console in production).  The
//! telemetry UART carries only the status lines themselves.

use log::{info, warn};

use crate::app::events::MonitorEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`MonitorEvent`] to the console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &MonitorEvent) {
        match event {
            MonitorEvent::Started { over, under } => {
                info!("START | over>={} under<={}", over, under);
            }
            MonitorEvent::ClassificationChanged { from, to, reading } => match from {
                Some(from) => info!("CLASS | {:?} -> {:?} (raw={})", from, to, reading),
                None => info!("CLASS | initial {:?} (raw={})", to, reading),
            },
            MonitorEvent::TelemetryFailed(e) => {
                warn!("TELEM | line dropped: {}", e);
            }
            MonitorEvent::Stopped(stats) => {
                info!(
                    "STOP  | cycles={} completed={} missed={}",
                    stats.cycles, stats.completed, stats.missed
                );
            }
        }
    }
}
