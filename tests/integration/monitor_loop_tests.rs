//! Integration tests for the acquirer → slot → MonitorLoop → indicators /
//! telemetry pipeline.
//!
//! Samples are delivered synchronously through [`AnalogAcquirer`] with a
//! scripted converter, so every interleaving here is deterministic.

use voltwatch::app::actuator::{LINE_NORMAL, LINE_OVER, LINE_UNDER, OutputPattern};
use voltwatch::app::events::MonitorEvent;
use voltwatch::app::service::{LoopState, MonitorLoop};
use voltwatch::classifier::Classification;
use voltwatch::config::MonitorConfig;
use voltwatch::drivers::adc::AnalogAcquirer;
use voltwatch::drivers::watchdog::Watchdog;
use voltwatch::events::{SampleSlot, StopFlag};

use crate::mock_hw::{MockIndicators, MockSerial, NoDelay, RecordingSink, ScriptedAdc};

type TestLoop<'a> = MonitorLoop<'a, MockIndicators, MockSerial, NoDelay>;

fn make_loop<'a>(slot: &'a SampleSlot, serial: MockSerial) -> (TestLoop<'a>, MockIndicators) {
    let indicators = MockIndicators::new();
    let mon = MonitorLoop::new(
        &MonitorConfig::default(),
        slot,
        indicators.clone(),
        Some(serial),
        NoDelay::default(),
    )
    .unwrap();
    (mon, indicators)
}

// ── Reference sequence ───────────────────────────────────────

#[test]
fn reference_sequence_classifies_actuates_and_reports() {
    let slot = SampleSlot::new();
    let serial = MockSerial::new();
    let (mut mon, indicators) = make_loop(&slot, serial.clone());
    let acquirer = AnalogAcquirer::new(&slot, 4);
    let mut adc = ScriptedAdc::readings(&[3700, 3000, 3400, 3661, 3201]);
    let mut sink = RecordingSink::new();

    let mut classes = Vec::new();
    for _ in 0..5 {
        acquirer.on_trigger(&mut adc);
        let cycle = mon.poll(&mut sink).expect("a published sample is processed");
        classes.push(cycle.classification);
    }

    assert_eq!(
        classes,
        vec![
            Classification::Over,
            Classification::Under,
            Classification::Normal,
            Classification::Over,
            Classification::Under,
        ]
    );
    assert_eq!(
        serial.text(),
        "Overvoltage Detected: 3700\r\n\
         Undervoltage Detected: 3000\r\n\
         Voltage Normal: 3400\r\n\
         Overvoltage Detected: 3661\r\n\
         Undervoltage Detected: 3201\r\n"
    );

    let over = OutputPattern::line(LINE_OVER);
    let under = OutputPattern::line(LINE_UNDER);
    let normal = OutputPattern::line(LINE_NORMAL);
    assert_eq!(
        indicators.history(),
        vec![OutputPattern::OFF, over, under, normal, over, under],
        "bank starts dark, then exactly one line per cycle"
    );

    let stats = mon.stats();
    assert_eq!(stats.cycles, 5);
    assert_eq!(stats.completed, 5);
    assert_eq!(stats.missed, 0);
}

// ── Slot discipline ───────────────────────────────────────────

#[test]
fn trigger_while_sample_pending_is_dropped() {
    let slot = SampleSlot::new();
    let serial = MockSerial::new();
    let (mut mon, _) = make_loop(&slot, serial.clone());
    let acquirer = AnalogAcquirer::new(&slot, 4);
    let mut adc = ScriptedAdc::readings(&[3700, 3000]);
    let mut sink = RecordingSink::new();

    acquirer.on_trigger(&mut adc);
    acquirer.on_trigger(&mut adc);
    assert_eq!(adc.conversions, 1, "second trigger must not start a conversion");
    assert_eq!(slot.missed(), 1);

    let cycle = mon.poll(&mut sink).unwrap();
    assert_eq!(cycle.reading, 3700);
    assert!(mon.poll(&mut sink).is_none());
    assert_eq!(serial.lines(), vec!["Overvoltage Detected: 3700"]);
}

#[test]
fn duplicate_completion_yields_one_cycle() {
    let slot = SampleSlot::new();
    let serial = MockSerial::new();
    let (mut mon, indicators) = make_loop(&slot, serial.clone());
    let acquirer = AnalogAcquirer::new(&slot, 4);
    let mut sink = RecordingSink::new();

    assert!(acquirer.begin_conversion());
    assert!(acquirer.on_complete(3400));
    assert!(!acquirer.on_complete(3400), "second completion is ignored");

    assert!(mon.poll(&mut sink).is_some());
    assert!(mon.poll(&mut sink).is_none());
    assert_eq!(serial.lines().len(), 1);
    assert_eq!(indicators.history().len(), 2);
}

#[test]
fn failed_conversion_is_not_processed() {
    let slot = SampleSlot::new();
    let serial = MockSerial::new();
    let (mut mon, _) = make_loop(&slot, serial.clone());
    let acquirer = AnalogAcquirer::new(&slot, 4);
    let mut adc = ScriptedAdc::new([None, Some(3400)]);
    let mut sink = RecordingSink::new();

    acquirer.on_trigger(&mut adc);
    assert!(!slot.is_busy(), "aborted conversion frees the slot");
    assert!(mon.poll(&mut sink).is_none());

    acquirer.on_trigger(&mut adc);
    let cycle = mon.poll(&mut sink).unwrap();
    assert_eq!(cycle.classification, Classification::Normal);
    assert_eq!(serial.lines(), vec!["Voltage Normal: 3400"]);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_failure_still_actuates() {
    let slot = SampleSlot::new();
    let (mut mon, indicators) = make_loop(&slot, MockSerial::failing_after(1));
    let acquirer = AnalogAcquirer::new(&slot, 4);
    let mut adc = ScriptedAdc::readings(&[3400, 3000]);
    let mut sink = RecordingSink::new();

    acquirer.on_trigger(&mut adc);
    assert!(mon.poll(&mut sink).unwrap().line.is_some());

    acquirer.on_trigger(&mut adc);
    let cycle = mon.poll(&mut sink).unwrap();
    assert!(cycle.line.is_none());
    assert_eq!(sink.telemetry_failures(), 1);
    assert_eq!(indicators.last(), Some(OutputPattern::line(LINE_UNDER)));
    assert_eq!(mon.last_classification(), Some(Classification::Under));
}

#[test]
fn telemetry_disabled_sends_nothing() {
    let slot = SampleSlot::new();
    let serial = MockSerial::new();
    let config = MonitorConfig {
        telemetry_enabled: false,
        ..MonitorConfig::default()
    };
    let mut mon = MonitorLoop::new(
        &config,
        &slot,
        MockIndicators::new(),
        Some(serial.clone()),
        NoDelay::default(),
    )
    .unwrap();
    let acquirer = AnalogAcquirer::new(&slot, 4);
    let mut sink = RecordingSink::new();

    acquirer.on_trigger(&mut ScriptedAdc::readings(&[3700]));
    assert_eq!(
        mon.poll(&mut sink).unwrap().classification,
        Classification::Over
    );
    assert!(serial.text().is_empty());
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn run_processes_until_stopped_from_another_thread() {
    let slot = SampleSlot::new();
    let stop = StopFlag::new();
    let serial = MockSerial::new();
    let (mut mon, indicators) = make_loop(&slot, serial.clone());
    let mut sink = RecordingSink::new();
    let mut watchdog = Watchdog::new();

    let stats = std::thread::scope(|s| {
        s.spawn(|| {
            let acquirer = AnalogAcquirer::new(&slot, 4);
            let mut adc = ScriptedAdc::readings(&[3700, 3000, 3400]);
            for _ in 0..3 {
                while slot.is_busy() {
                    std::hint::spin_loop();
                }
                acquirer.on_trigger(&mut adc);
            }
            while slot.is_busy() {
                std::hint::spin_loop();
            }
            stop.request_stop();
        });
        mon.run(&stop, &mut sink, &mut watchdog)
    });

    assert_eq!(stats.cycles, 3);
    assert_eq!(stats.missed, 0);
    assert!(watchdog.feeds() >= stats.cycles, "every cycle feeds the watchdog");
    assert_eq!(
        serial.lines(),
        vec![
            "Overvoltage Detected: 3700",
            "Undervoltage Detected: 3000",
            "Voltage Normal: 3400",
        ]
    );
    assert_eq!(indicators.last(), Some(OutputPattern::OFF), "stop drives the bank dark");
    assert_eq!(mon.state(), LoopState::Idle);
    assert!(matches!(sink.events.first(), Some(MonitorEvent::Started { .. })));
    assert_eq!(sink.events.last(), Some(&MonitorEvent::Stopped(stats)));
}
