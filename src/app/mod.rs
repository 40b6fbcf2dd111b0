//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the monitor's rules: classification → indicator
//! mapping and the foreground sample loop.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod actuator;
pub mod events;
pub mod ports;
pub mod service;
