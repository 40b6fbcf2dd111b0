//! GPIO / peripheral pin assignments for the VoltWatch board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Indicator lines (discrete RGB LED, active HIGH)
// ---------------------------------------------------------------------------

/// Over-voltage indicator (red).
pub const LED_OVER_GPIO: i32 = 11;
/// Under-voltage indicator (blue).
pub const LED_UNDER_GPIO: i32 = 12;
/// Supply-normal indicator (green).
pub const LED_NORMAL_GPIO: i32 = 13;

/// Indicator GPIOs in line order (bit 0 first).
pub const INDICATOR_GPIOS: [i32; 3] = [LED_OVER_GPIO, LED_UNDER_GPIO, LED_NORMAL_GPIO];

// ---------------------------------------------------------------------------
// UART telemetry
// ---------------------------------------------------------------------------

/// UART peripheral used for status lines (UART0 stays on the console).
pub const TELEMETRY_UART: i32 = 1;
pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
/// Driver TX ring buffer; `uart_write_bytes` blocks while it is full.
pub const UART_TX_BUFFER: i32 = 256;
/// Driver RX ring buffer (minimum the driver accepts; RX is unused).
pub const UART_RX_BUFFER: i32 = 256;
