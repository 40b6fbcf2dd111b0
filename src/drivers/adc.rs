//! Supply-voltage acquisition.
//!
//! [`AnalogAcquirer`] sits between the periodic trigger and the
//! [`SampleSlot`]: each timer expiry calls [`on_trigger`](AnalogAcquirer::on_trigger),
//! which claims the slot, runs one conversion and publishes the result as
//! the completion event.  If the slot is still busy the expiry is a missed
//! sample and nothing is converted.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`OneShotAdc`] reads ADC1 via the oneshot API (initialised by
//! hw_init).  On host/test: it reads the value injected with
//! [`hw_init::sim_set_adc`](super::hw_init).

use log::{trace, warn};

use crate::app::ports::{ConversionError, ConversionPort};
use crate::events::{Reading, SampleSlot};

use super::hw_init;

/// One-shot ADC1 conversions through the hw_init driver.
pub struct OneShotAdc {
    max_reading: Reading,
}

impl OneShotAdc {
    /// `resolution_bits` masks off anything above the converter range.
    pub fn new(resolution_bits: u8) -> Self {
        let bits = u32::from(resolution_bits.min(16));
        Self {
            max_reading: ((1u32 << bits) - 1) as Reading,
        }
    }
}

impl ConversionPort for OneShotAdc {
    fn convert(&mut self, channel: u8) -> Result<Reading, ConversionError> {
        hw_init::adc1_read(channel).map(|raw| raw.min(self.max_reading))
    }
}

/// Trigger → conversion → completion glue for one preselected channel.
pub struct AnalogAcquirer<'a> {
    slot: &'a SampleSlot,
    channel: u8,
}

impl<'a> AnalogAcquirer<'a> {
    pub fn new(slot: &'a SampleSlot, channel: u8) -> Self {
        Self { slot, channel }
    }

    /// Claim the slot for a conversion.  `false` means a sample is still
    /// in flight and this trigger is dropped.
    pub fn begin_conversion(&self) -> bool {
        self.slot.begin()
    }

    /// Completion event: hand `raw` to the foreground loop.  Ignored if
    /// no conversion was pending.
    pub fn on_complete(&self, raw: Reading) -> bool {
        self.slot.publish(raw)
    }

    /// Full trigger handler for synchronous converters.
    pub fn on_trigger(&self, adc: &mut impl ConversionPort) {
        if !self.begin_conversion() {
            trace!("adc: trigger dropped, sample still in flight");
            return;
        }
        match adc.convert(self.channel) {
            Ok(raw) => {
                self.on_complete(raw);
            }
            Err(e) => {
                warn!("adc: conversion on CH{} failed: {}", self.channel, e);
                self.slot.abort();
            }
        }
    }
}
