//! Peripheral drivers: trigger timer, ADC acquisition, indicator lines,
//! pacing delay, task watchdog and one-shot hardware initialisation.

pub mod adc;
pub mod hw_init;
pub mod hw_timer;
pub mod indicators;
pub mod pacing;
pub mod watchdog;
