//! Unified error type for the VoltWatch firmware.
//!
//! Every boot-time failure funnels into [`Error`], so `main` can lift it
//! into `anyhow::Result` with `?`.  Runtime faults never reach this type:
//! a missed sample is counted by the slot, and a failed telemetry write is
//! reported through the event sink.

use core::fmt;

use crate::config::ConfigError;
use crate::drivers::hw_init::HwInitError;
use crate::drivers::hw_timer::TriggerError;

/// Every fallible boot step in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// The sample trigger could not be armed.
    Trigger(TriggerError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Trigger(e) => write!(f, "trigger: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<TriggerError> for Error {
    fn from(e: TriggerError) -> Self {
        Self::Trigger(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
