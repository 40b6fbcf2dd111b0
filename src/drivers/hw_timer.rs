//! Periodic sample trigger.
//!
//! Arms a recurring timer whose only job is to ask the
//! [`AnalogAcquirer`](super::adc::AnalogAcquirer) for one conversion per
//! period.  The period is expressed the way the hardware sees it: a reload
//! count of `clock_hz × interval` timer ticks.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: an `esp_timer` periodic timer (1 MHz time base) dispatched
//! from the timer task, with unhandled expiries skipped rather than queued.
//! On host/test: a background thread that sleeps one period between calls.

use core::fmt;
use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use log::info;

use crate::config::ConfigError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(not(target_os = "espidf"))]
use std::sync::atomic::AtomicBool;
#[cfg(not(target_os = "espidf"))]
use std::thread::JoinHandle;
#[cfg(not(target_os = "espidf"))]
use std::time::Instant;

type Callback = Box<dyn FnMut() + Send + 'static>;

/// Timer reload count for `interval` at `clock_hz`.
///
/// Fails if the clock is zero, the interval rounds to zero ticks, or the
/// count does not fit a 32-bit reload register.
pub fn reload_count(clock_hz: u32, interval: Duration) -> Result<u32, ConfigError> {
    let ticks = u128::from(clock_hz) * interval.as_nanos() / 1_000_000_000;
    match u32::try_from(ticks) {
        Ok(0) | Err(_) => Err(ConfigError::Reload),
        Ok(reload) => Ok(reload),
    }
}

/// Errors while arming the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerError {
    AlreadyRunning,
    CreateFailed(i32),
    StartFailed(i32),
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "trigger already running"),
            Self::CreateFailed(rc) => write!(f, "timer create failed (rc={})", rc),
            Self::StartFailed(rc) => write!(f, "timer start failed (rc={})", rc),
        }
    }
}

pub struct PeriodicTrigger {
    clock_hz: u32,
    reload: u32,
    expiries: Arc<AtomicU32>,
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    #[cfg(target_os = "espidf")]
    callback: *mut Callback,
    #[cfg(not(target_os = "espidf"))]
    worker: Option<(Arc<AtomicBool>, JoinHandle<()>)>,
}

impl PeriodicTrigger {
    /// Compute and validate the reload count.  Nothing is armed yet.
    pub fn new(clock_hz: u32, interval: Duration) -> Result<Self, ConfigError> {
        let reload = reload_count(clock_hz, interval)?;
        Ok(Self {
            clock_hz,
            reload,
            expiries: Arc::new(AtomicU32::new(0)),
            #[cfg(target_os = "espidf")]
            handle: core::ptr::null_mut(),
            #[cfg(target_os = "espidf")]
            callback: core::ptr::null_mut(),
            #[cfg(not(target_os = "espidf"))]
            worker: None,
        })
    }

    pub fn reload(&self) -> u32 {
        self.reload
    }

    /// Actual period implied by the reload count.
    pub fn period(&self) -> Duration {
        let nanos = u64::from(self.reload) * 1_000_000_000 / u64::from(self.clock_hz);
        Duration::from_nanos(nanos)
    }

    /// Timer expiries since `start`.
    pub fn expiries(&self) -> u32 {
        self.expiries.load(Ordering::Relaxed)
    }

    fn counted(&self, mut on_expiry: impl FnMut() + Send + 'static) -> Callback {
        let expiries = Arc::clone(&self.expiries);
        Box::new(move || {
            expiries.fetch_add(1, Ordering::Relaxed);
            on_expiry();
        })
    }
}

// ── ESP-IDF ──────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn trigger_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the callback leaked in start(); it is freed only
    // after the timer has been stopped and deleted.
    let callback = unsafe { &mut *arg.cast::<Callback>() };
    callback();
}

#[cfg(target_os = "espidf")]
impl PeriodicTrigger {
    /// Arm the timer.  `on_expiry` runs in the esp_timer task once per period.
    pub fn start(&mut self, on_expiry: impl FnMut() + Send + 'static) -> Result<(), TriggerError> {
        if !self.handle.is_null() {
            return Err(TriggerError::AlreadyRunning);
        }
        let callback = Box::into_raw(Box::new(self.counted(on_expiry)));

        let args = esp_timer_create_args_t {
            callback: Some(trigger_cb),
            arg: callback.cast(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"adc_trigger".as_ptr(),
            // Late expiries are dropped, never queued.
            skip_unhandled_events: true,
        };
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: args outlives the call; handle is written by the driver.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK {
            // SAFETY: the timer was never created, so nothing else holds the pointer.
            drop(unsafe { Box::from_raw(callback) });
            log::error!("hw_timer: create failed (rc={})", ret);
            return Err(TriggerError::CreateFailed(ret));
        }

        let period_us = self.period().as_micros() as u64;
        // SAFETY: handle was just created.
        let ret = unsafe { esp_timer_start_periodic(handle, period_us) };
        if ret != ESP_OK {
            unsafe {
                esp_timer_delete(handle);
                drop(Box::from_raw(callback));
            }
            log::error!("hw_timer: start failed (rc={})", ret);
            return Err(TriggerError::StartFailed(ret));
        }

        self.handle = handle;
        self.callback = callback;
        info!("hw_timer: sample trigger every {} us (reload={})", period_us, self.reload);
        Ok(())
    }

    /// Disarm the timer and free the callback.
    pub fn stop(&mut self) {
        if self.handle.is_null() {
            return;
        }
        // SAFETY: handle is valid until deleted here; after esp_timer_delete
        // the callback can no longer run, so the box can be reclaimed.
        unsafe {
            esp_timer_stop(self.handle);
            esp_timer_delete(self.handle);
            drop(Box::from_raw(self.callback));
        }
        self.handle = core::ptr::null_mut();
        self.callback = core::ptr::null_mut();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_null()
    }
}

// ── Host simulation ──────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl PeriodicTrigger {
    /// Arm the trigger.  `on_expiry` runs on a background thread once
    /// per period until [`stop`](Self::stop).
    pub fn start(&mut self, on_expiry: impl FnMut() + Send + 'static) -> Result<(), TriggerError> {
        if self.worker.is_some() {
            return Err(TriggerError::AlreadyRunning);
        }
        let mut callback = self.counted(on_expiry);
        let period = self.period();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = std::thread::spawn(move || {
            let mut next = Instant::now() + period;
            while !stop_flag.load(Ordering::Acquire) {
                std::thread::sleep(next.saturating_duration_since(Instant::now()));
                if stop_flag.load(Ordering::Acquire) {
                    break;
                }
                callback();
                next += period;
            }
        });

        self.worker = Some((stop, handle));
        info!("hw_timer(sim): sample trigger every {:?} (reload={})", period, self.reload);
        Ok(())
    }

    /// Disarm the trigger and join the worker thread.
    pub fn stop(&mut self) {
        if let Some((stop, handle)) = self.worker.take() {
            stop.store(true, Ordering::Release);
            if handle.join().is_err() {
                log::warn!("hw_timer(sim): trigger thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for PeriodicTrigger {
    fn drop(&mut self) {
        self.stop();
    }
}
