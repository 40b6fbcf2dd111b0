//! VoltWatch Firmware — Main Entry Point
//!
//! Interrupt-driven sample pipeline with a busy-paced foreground loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  esp_timer task (every 10 ms)                                  │
//! │    PeriodicTrigger ──▶ AnalogAcquirer ──▶ ADC1 oneshot         │
//! │                                 │                              │
//! │                                 ▼ publish()                    │
//! │  ─────────────────────── SampleSlot (atomic) ─────────────     │
//! │                                 │ take()                       │
//! │  main task                      ▼                              │
//! │    MonitorLoop: classify ─▶ IndicatorBank (GPIO 11/12/13)      │
//! │                         └─▶ TelemetryReporter (UART1)          │
//! │                 pace (Ets busy-wait) ─▶ release()              │
//! │                 feed TWDT once per iteration                   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::Ets;
use log::{error, info};

use voltwatch::adapters::log_sink::LogEventSink;
use voltwatch::adapters::serial::UartSerial;
use voltwatch::app::service::MonitorLoop;
use voltwatch::config::MonitorConfig;
use voltwatch::drivers::adc::{AnalogAcquirer, OneShotAdc};
use voltwatch::drivers::hw_init;
use voltwatch::drivers::hw_timer::PeriodicTrigger;
use voltwatch::drivers::indicators::{GpioLine, IndicatorBank};
use voltwatch::drivers::watchdog::Watchdog;
use voltwatch::error::Error;
use voltwatch::events::{SampleSlot, StopFlag};
use voltwatch::pins;

// ── Shared state ──────────────────────────────────────────────
//
// SLOT is the only memory shared between the timer task (writer) and the
// main task (reader).  STOP is never raised on hardware: the loop runs
// until reset.

static SLOT: SampleSlot = SampleSlot::new();
static STOP: StopFlag = StopFlag::new();

/// Reference calibration, or the JSON override baked in at build time.
fn load_config() -> voltwatch::error::Result<MonitorConfig> {
    match option_env!("VOLTWATCH_CONFIG") {
        Some(json) => {
            let config = MonitorConfig::from_json(json)?;
            info!("Config: build-time override applied");
            Ok(config)
        }
        None => {
            let config = MonitorConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Arm the sample trigger.  Each expiry runs one ADC conversion in the
/// esp_timer task and publishes it into SLOT.
fn arm_trigger(config: &MonitorConfig) -> voltwatch::error::Result<PeriodicTrigger> {
    let mut trigger = PeriodicTrigger::new(config.timer_clock_hz, config.sample_interval())?;
    let acquirer = AnalogAcquirer::new(&SLOT, config.adc_channel);
    let mut adc = OneShotAdc::new(config.adc_resolution_bits);
    trigger.start(move || acquirer.on_trigger(&mut adc))?;
    Ok(trigger)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  VoltWatch v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (fail fast) ──────────────────────────
    let config = load_config().inspect_err(|e| error!("Config rejected: {} — halting", e))?;
    info!(
        "Config: over>={} under<={} CH{} every {} ms, pacing {} ms",
        config.over_threshold,
        config.under_threshold,
        config.adc_channel,
        config.sample_interval_ms,
        config.pacing_delay_ms
    );

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals(&config)
        .map_err(Error::from)
        .inspect_err(|e| error!("HAL init failed: {} — halting", e))?;

    // ── 4. Monitor loop ───────────────────────────────────────
    let indicators = IndicatorBank::new(pins::INDICATOR_GPIOS.map(GpioLine::new));
    let serial = config.telemetry_enabled.then(UartSerial::new);
    let mut monitor =
        MonitorLoop::new(&config, &SLOT, indicators, serial, Ets).map_err(Error::from)?;

    // ── 5. Trigger (last, so no sample lands before the loop exists) ──
    let _trigger = arm_trigger(&config)?;

    // ── 6. Watchdog (subscribes this task, the one running the loop) ──
    let mut watchdog = Watchdog::new();

    info!("System ready. Entering monitor loop.");

    let mut sink = LogEventSink::new();
    let stats = monitor.run(&STOP, &mut sink, &mut watchdog);
    info!("Monitor loop exited after {} cycles", stats.cycles);
    Ok(())
}
