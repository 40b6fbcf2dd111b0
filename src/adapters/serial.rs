//! Telemetry serial adapters.
//!
//! - **`target_os = "espidf"`** — [`UartSerial`] queues lines on the
//!   telemetry UART through hw_init; the driver blocks while its TX ring
//!   buffer is full.
//! - **`not(target_os = "espidf")`** — [`WriteSerial`] wraps any
//!   `std::io::Write` (stdout, a `Vec<u8>`, a pipe) with the same
//!   all-or-nothing contract.

use crate::app::ports::{SerialError, SerialPort};

/// Telemetry UART configured by `hw_init::init_peripherals`.
#[cfg(target_os = "espidf")]
pub struct UartSerial;

#[cfg(target_os = "espidf")]
impl UartSerial {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl SerialPort for UartSerial {
    fn write_line(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        crate::drivers::hw_init::uart_write(bytes)
    }
}

/// Line transmitter over a blocking `std::io::Write`.
pub struct WriteSerial<W: std::io::Write> {
    inner: W,
}

impl<W: std::io::Write> WriteSerial<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: std::io::Write> SerialPort for WriteSerial<W> {
    fn write_line(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.inner.write_all(bytes).map_err(|_| SerialError::Io)?;
        self.inner.flush().map_err(|_| SerialError::Io)
    }
}
