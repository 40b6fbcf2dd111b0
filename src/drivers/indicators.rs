//! Indicator line driver.
//!
//! [`IndicatorBank`] owns one [`OutputPin`] per indicator line and
//! implements [`IndicatorPort`]: every write drives each line to match its
//! bit in the pattern, so lines outside the active pattern are cleared.
//!
//! [`GpioLine`] is the concrete pin on this board.  It goes through
//! hw_init's raw GPIO calls, which keeps the bank generic over any
//! `embedded-hal` output (including `esp_idf_hal::gpio::PinDriver`).

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use log::warn;

use crate::app::actuator::OutputPattern;
use crate::app::ports::IndicatorPort;

use super::hw_init;

/// Bank of `N` indicator lines; line `n` is driven by bit `n`.
pub struct IndicatorBank<P: OutputPin, const N: usize> {
    lines: [P; N],
}

impl<P: OutputPin, const N: usize> IndicatorBank<P, N> {
    pub fn new(lines: [P; N]) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[P; N] {
        &self.lines
    }
}

impl<P: OutputPin, const N: usize> IndicatorPort for IndicatorBank<P, N> {
    fn write_pattern(&mut self, pattern: OutputPattern) {
        for (n, pin) in self.lines.iter_mut().enumerate() {
            let state = PinState::from(pattern.is_set(n as u8));
            if let Err(e) = pin.set_state(state) {
                warn!("indicators: line {} write failed: {:?}", n, e);
            }
        }
    }
}

/// Output pin addressed by GPIO number.
pub struct GpioLine {
    gpio: i32,
}

impl GpioLine {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    fn write(&mut self, high: bool) {
        if let Err(rc) = hw_init::gpio_write(self.gpio, high) {
            warn!("indicators: gpio_set_level({}) failed (rc={})", self.gpio, rc);
        }
    }
}

impl ErrorType for GpioLine {
    type Error = Infallible;
}

impl OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}
