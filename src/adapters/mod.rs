//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements   | Connects to                 |
//! |-------------|--------------|-----------------------------|
//! | `log_sink`  | EventSink    | `log` facade / console      |
//! | `serial`    | SerialPort   | Telemetry UART / `io::Write`|
//! | `time`      | DelayNs      | Monotonic clock busy-wait   |
//!
//! The ADC and indicator adapters live with their drivers
//! (`drivers::adc::OneShotAdc`, `drivers::indicators::IndicatorBank`).

pub mod log_sink;
pub mod serial;
pub mod time;
