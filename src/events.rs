//! Interrupt → main-loop sample hand-off.
//!
//! The conversion-complete handler (ISR or `esp_timer` task) produces
//! readings; the foreground monitor loop consumes them.  The only memory
//! shared between the two is a [`SampleSlot`].
//!
//! ```text
//! ┌──────────────┐ begin()   ┌──────────────┐  take()   ┌──────────────┐
//! │ Timer expiry │──────────▶│              │──────────▶│              │
//! │              │           │  SampleSlot  │           │  Main Loop   │
//! │ ADC complete │──────────▶│  (lock-free) │◀──────────│  (consumer)  │
//! └──────────────┘ publish() └──────────────┘ release() └──────────────┘
//! ```
//!
//! The slot is a four-phase handshake:
//!
//! | Phase        | Entered by                      | Owner of `value` |
//! |--------------|---------------------------------|------------------|
//! | `IDLE`       | `release()` / `abort()`         | nobody           |
//! | `CONVERTING` | `begin()` (trigger)             | handler          |
//! | `READY`      | `publish()` (completion)        | handoff          |
//! | `PROCESSING` | `take()` (foreground)           | foreground       |
//!
//! A trigger that finds the slot anywhere but `IDLE` is a missed sample:
//! it is counted and dropped, never queued.  A completion that arrives
//! without a pending conversion is ignored, so a reading can only enter the
//! pipeline once.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, AtomicU32, Ordering};

/// One raw ADC sample (0..=4095 for the 12-bit reference converter).
pub type Reading = u16;

const IDLE: u8 = 0;
const CONVERTING: u8 = 1;
const READY: u8 = 2;
const PROCESSING: u8 = 3;

/// Single-writer / single-reader cell for the most recent reading.
pub struct SampleSlot {
    phase: AtomicU8,
    value: AtomicU16,
    has_value: AtomicBool,
    completed: AtomicU32,
    missed: AtomicU32,
}

impl Default for SampleSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSlot {
    pub const fn new() -> Self {
        Self {
            phase: AtomicU8::new(IDLE),
            value: AtomicU16::new(0),
            has_value: AtomicBool::new(false),
            completed: AtomicU32::new(0),
            missed: AtomicU32::new(0),
        }
    }

    // ── Producer side (trigger / completion context) ──────────

    /// Claim the slot for a new conversion.
    /// Returns `false` (and counts a missed sample) if the previous
    /// sample has not been consumed yet.
    pub fn begin(&self) -> bool {
        match self
            .phase
            .compare_exchange(IDLE, CONVERTING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => true,
            Err(_) => {
                self.missed.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Publish the result of the pending conversion.
    /// Returns `false` if no conversion was pending (spurious completion).
    pub fn publish(&self, raw: Reading) -> bool {
        // Only the completion context moves the slot out of CONVERTING,
        // so the check cannot race with another writer.
        if self.phase.load(Ordering::Acquire) != CONVERTING {
            return false;
        }
        self.value.store(raw, Ordering::Relaxed);
        self.has_value.store(true, Ordering::Release);
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.phase.store(READY, Ordering::Release);
        true
    }

    /// Abandon the pending conversion (hardware read failed).
    pub fn abort(&self) {
        let _ = self
            .phase
            .compare_exchange(CONVERTING, IDLE, Ordering::AcqRel, Ordering::Relaxed);
    }

    // ── Consumer side (foreground loop) ──────────────────────

    /// Take the published reading, if any.  The slot stays claimed
    /// until [`release`](Self::release) so triggers during processing
    /// are dropped rather than overwriting the value in flight.
    pub fn take(&self) -> Option<Reading> {
        self.phase
            .compare_exchange(READY, PROCESSING, Ordering::AcqRel, Ordering::Relaxed)
            .ok()
            .map(|_| self.value.load(Ordering::Relaxed))
    }

    /// Hand the slot back to the trigger after processing finished.
    pub fn release(&self) {
        let _ = self
            .phase
            .compare_exchange(PROCESSING, IDLE, Ordering::AcqRel, Ordering::Relaxed);
    }

    // ── Queries ──────────────────────────────────────────────

    /// Most recently published reading, without consuming it.
    pub fn last(&self) -> Option<Reading> {
        if self.has_value.load(Ordering::Acquire) {
            Some(self.value.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// True while a conversion is pending or a reading awaits the loop.
    pub fn is_busy(&self) -> bool {
        self.phase.load(Ordering::Acquire) != IDLE
    }

    /// Conversions published since boot.
    pub fn completed(&self) -> u32 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Triggers dropped because the slot was busy.
    pub fn missed(&self) -> u32 {
        self.missed.load(Ordering::Relaxed)
    }
}

/// Cooperative shutdown hook, checked once per loop iteration.
pub struct StopFlag(AtomicBool);

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl StopFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
