//! Busy-wait delay source for the pacing step.
//!
//! - **`target_os = "espidf"`** — use `esp_idf_hal::delay::Ets`, the ROM
//!   `esp_rom_delay_us` spin, directly.
//! - **`not(target_os = "espidf")`** — [`SpinDelay`] spins on
//!   `std::time::Instant` so host runs pace with the same wall-clock
//!   duration and without yielding.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

/// Monotonic-clock busy-wait.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinDelay;

impl SpinDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let deadline = Instant::now() + Duration::from_nanos(u64::from(ns));
        while Instant::now() < deadline {
            core::hint::spin_loop();
        }
    }
}
