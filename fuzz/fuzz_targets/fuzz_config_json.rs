//! Fuzz target: `MonitorConfig::from_json`
//!
//! Feeds arbitrary bytes to the build-time configuration parser and
//! verifies:
//! - No panics under arbitrary input
//! - Every accepted configuration passes `validate()`
//! - Accepted thresholds are ordered and inside the ADC range
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use voltwatch::config::MonitorConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = MonitorConfig::from_json(json) {
        assert!(config.validate().is_ok());
        let thresholds = config.thresholds().expect("validated thresholds");
        assert!(thresholds.under() < thresholds.over());
        assert!(thresholds.over() <= config.max_reading());
    }
});
