//! Pacing delay between monitor cycles.
//!
//! A deliberate busy-wait: nothing else competes for the core, so the
//! loop spins instead of yielding.  The delay source is any
//! [`DelayNs`] implementation: `esp_idf_hal::delay::Ets` (ROM busy-wait)
//! on hardware, [`SpinDelay`](crate::adapters::time::SpinDelay) on the host.

use core::time::Duration;

use embedded_hal::delay::DelayNs;

pub struct Pacer<D: DelayNs> {
    delay: D,
    period_us: u32,
}

impl<D: DelayNs> Pacer<D> {
    pub fn new(delay: D, period: Duration) -> Self {
        let period_us = u32::try_from(period.as_micros()).unwrap_or(u32::MAX);
        Self { delay, period_us }
    }

    /// Spin for one pacing period.
    pub fn pace(&mut self) {
        if self.period_us > 0 {
            self.delay.delay_us(self.period_us);
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_micros(u64::from(self.period_us))
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}
