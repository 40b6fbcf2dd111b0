//! Task Watchdog Timer (TWDT) driver.
//!
//! The monitor loop busy-waits and never blocks, so the FreeRTOS idle
//! task on its core never runs.  The TWDT is therefore reconfigured with
//! no idle-task subscriptions and the loop's own task is subscribed
//! instead: the device resets if [`feed`](Watchdog::feed) stops arriving.
//!
//! On host/test the driver only counts feeds.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::app::ports::WatchdogPort;
use crate::config::MAX_PACING_DELAY_MS;

/// Reset timeout.  One loop iteration is bounded by the pacing delay
/// plus a single status line, so this must stay above the pacing limit.
pub const WATCHDOG_TIMEOUT_MS: u32 = 15_000;

const _: () = assert!(WATCHDOG_TIMEOUT_MS > MAX_PACING_DELAY_MS);

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    #[cfg(not(target_os = "espidf"))]
    feeds: u64,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Reconfigure the TWDT and subscribe the calling task.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Self {
        let cfg = esp_task_wdt_config_t {
            timeout_ms: WATCHDOG_TIMEOUT_MS,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: called once from main() on the task that runs the loop.
        let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
        if ret != ESP_OK as i32 {
            log::warn!("watchdog: reconfigure returned {} (may already be configured)", ret);
        }

        // SAFETY: a null handle subscribes the current task.
        let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
        let subscribed = ret == ESP_OK as i32;
        if subscribed {
            info!("watchdog: subscribed ({} ms timeout, panic on trigger)", WATCHDOG_TIMEOUT_MS);
        } else {
            log::warn!("watchdog: failed to subscribe ({})", ret);
        }
        Self { subscribed }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        info!("watchdog(sim): counting feeds only");
        Self { feeds: 0 }
    }

    /// Feeds since construction.
    #[cfg(not(target_os = "espidf"))]
    pub fn feeds(&self) -> u64 {
        self.feeds
    }
}

impl WatchdogPort for Watchdog {
    #[cfg(target_os = "espidf")]
    fn feed(&mut self) {
        if self.subscribed {
            // SAFETY: the calling task was subscribed in new().
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn feed(&mut self) {
        self.feeds += 1;
    }
}
