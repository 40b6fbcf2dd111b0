//! End-to-end tests with the host-simulated periodic trigger.
//!
//! The trigger runs on its own thread exactly as the esp_timer task does on
//! hardware, so these tests exercise the real producer/consumer handshake.
//! Statics are leaked because the trigger callback must be `'static`.

use std::time::{Duration, Instant};

use voltwatch::adapters::time::SpinDelay;
use voltwatch::app::service::MonitorLoop;
use voltwatch::config::MonitorConfig;
use voltwatch::drivers::adc::{AnalogAcquirer, OneShotAdc};
use voltwatch::drivers::hw_init;
use voltwatch::drivers::hw_timer::PeriodicTrigger;
use voltwatch::drivers::watchdog::Watchdog;
use voltwatch::events::{SampleSlot, StopFlag};

use crate::mock_hw::{MockIndicators, MockSerial, NoDelay, RecordingSink, ScriptedAdc};

const DEADLINE: Duration = Duration::from_secs(10);

fn leak_slot() -> &'static SampleSlot {
    Box::leak(Box::new(SampleSlot::new()))
}

/// Raise `stop` once `done` holds, or after [`DEADLINE`].
fn stop_when(stop: &StopFlag, done: impl Fn() -> bool) {
    let start = Instant::now();
    while !done() && start.elapsed() < DEADLINE {
        std::thread::sleep(Duration::from_millis(1));
    }
    stop.request_stop();
}

#[test]
fn timer_driven_samples_arrive_in_order() {
    let slot = leak_slot();
    let stop = StopFlag::new();
    let config = MonitorConfig {
        sample_interval_ms: 2,
        pacing_delay_ms: 0,
        ..MonitorConfig::default()
    };
    let serial = MockSerial::new();
    let mut mon = MonitorLoop::new(
        &config,
        slot,
        MockIndicators::new(),
        Some(serial.clone()),
        NoDelay::default(),
    )
    .unwrap();

    let mut trigger = PeriodicTrigger::new(config.timer_clock_hz, config.sample_interval()).unwrap();
    let acquirer = AnalogAcquirer::new(slot, config.adc_channel);
    let mut adc = ScriptedAdc::readings(&[3700, 3000, 3400, 3661, 3201]);
    trigger.start(move || acquirer.on_trigger(&mut adc)).unwrap();

    let mut sink = RecordingSink::new();
    let mut watchdog = Watchdog::new();
    let stats = std::thread::scope(|s| {
        s.spawn(|| stop_when(&stop, || serial.lines().len() >= 5));
        mon.run(&stop, &mut sink, &mut watchdog)
    });
    trigger.stop();

    let lines = serial.lines();
    assert_eq!(
        &lines[..5],
        [
            "Overvoltage Detected: 3700",
            "Undervoltage Detected: 3000",
            "Voltage Normal: 3400",
            "Overvoltage Detected: 3661",
            "Undervoltage Detected: 3201",
        ]
    );
    assert!(stats.cycles >= 5);
    assert!(watchdog.feeds() >= stats.cycles);
    assert!(stats.completed as u64 >= stats.cycles);
    assert!(trigger.expiries() >= stats.completed);
}

#[test]
fn triggers_during_pacing_are_counted_as_missed() {
    let slot = leak_slot();
    let stop = StopFlag::new();
    let config = MonitorConfig {
        sample_interval_ms: 1,
        pacing_delay_ms: 20,
        ..MonitorConfig::default()
    };
    hw_init::sim_set_adc(5000);
    let serial = MockSerial::new();
    let mut mon = MonitorLoop::new(
        &config,
        slot,
        MockIndicators::new(),
        Some(serial.clone()),
        SpinDelay::new(),
    )
    .unwrap();

    let mut trigger = PeriodicTrigger::new(config.timer_clock_hz, config.sample_interval()).unwrap();
    let acquirer = AnalogAcquirer::new(slot, config.adc_channel);
    let mut adc = OneShotAdc::new(config.adc_resolution_bits);
    trigger.start(move || acquirer.on_trigger(&mut adc)).unwrap();

    let mut sink = RecordingSink::new();
    let mut watchdog = Watchdog::new();
    let stats = std::thread::scope(|s| {
        s.spawn(|| stop_when(&stop, || serial.lines().len() >= 3));
        mon.run(&stop, &mut sink, &mut watchdog)
    });
    trigger.stop();

    assert!(stats.missed > 0, "1 ms triggers cannot all land during 20 ms pacing");
    // Out-of-range input is clamped to the 12-bit ceiling.
    assert_eq!(serial.lines()[0], "Overvoltage Detected: 4095");
}
