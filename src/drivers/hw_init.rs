//! One-shot hardware peripheral initialization.
//!
//! Configures the supply ADC channel, the indicator GPIOs and the telemetry
//! UART using raw ESP-IDF sys calls.  Called once from `main()` before the
//! trigger is armed.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: raw `esp_idf_svc::sys` calls.
//! On host/test: the ADC reads from an injectable `AtomicU16` and GPIO
//! writes land in an `AtomicU64` level map.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, AtomicU64, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::app::ports::ConversionError;
#[cfg(target_os = "espidf")]
use crate::app::ports::SerialError;
use crate::config::MonitorConfig;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    UnsupportedResolution(u8),
    GpioConfigFailed(i32),
    UartInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)         => write!(f, "ADC1 init failed (rc={})", rc),
            Self::UnsupportedResolution(b)  => write!(f, "ADC1 does not support {}-bit conversions", b),
            Self::GpioConfigFailed(rc)      => write!(f, "GPIO config failed (rc={})", rc),
            Self::UartInitFailed(rc)        => write!(f, "UART init failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals(config: &MonitorConfig) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the trigger is armed; single-threaded.
    unsafe {
        init_adc(config.adc_channel, config.adc_resolution_bits)?;
        init_gpio_outputs()?;
        if config.telemetry_enabled {
            init_uart(config.uart_baud)?;
        }
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_config: &MonitorConfig) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: ADC1_HANDLE is written once in `init_adc()` before the trigger
/// is armed; afterwards only the trigger context reads it.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc(channel: u8, bits: u8) -> Result<(), HwInitError> {
    // The S3's SAR ADC only converts at 12 bits.
    if bits != 12 {
        return Err(HwInitError::UnsupportedResolution(bits));
    }

    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe {
        adc_oneshot_config_channel(adc1_handle(), channel as adc_channel_t, &chan_cfg)
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    info!("hw_init: ADC1 CH{} configured (12-bit, 12 dB)", channel);
    Ok(())
}

/// Blocking one-shot conversion on ADC1.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u8) -> Result<u16, ConversionError> {
    // SAFETY: adc1_handle() contract — initialised before the trigger runs.
    let handle = unsafe { adc1_handle() };
    if handle.is_null() {
        return Err(ConversionError::ChannelNotConfigured(channel));
    }
    let mut raw: i32 = 0;
    let ret = unsafe { adc_oneshot_read(handle, channel as adc_channel_t, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(ConversionError::ReadFailed(ret));
    }
    Ok(raw.max(0) as u16)
}

#[cfg(not(target_os = "espidf"))]
static SIM_ADC: AtomicU16 = AtomicU16::new(0);

/// Set the value the simulated ADC returns.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(raw: u16) {
    SIM_ADC.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u8) -> Result<u16, ConversionError> {
    Ok(SIM_ADC.load(Ordering::Relaxed))
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for &pin in &pins::INDICATOR_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: indicator GPIOs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    // SAFETY: gpio_set_level writes to an output pin configured in
    // init_gpio_outputs(). Main-loop only.
    let ret = unsafe { gpio_set_level(pin as gpio_num_t, u32::from(high)) };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
static SIM_GPIO_LEVELS: AtomicU64 = AtomicU64::new(0);

/// `ESP_ERR_INVALID_ARG`, as `gpio_set_level` reports a bad pin number.
#[cfg(not(target_os = "espidf"))]
const SIM_ERR_INVALID_ARG: i32 = 0x102;

#[cfg(not(target_os = "espidf"))]
fn sim_gpio_mask(pin: i32) -> Option<u64> {
    u32::try_from(pin).ok().and_then(|p| 1u64.checked_shl(p))
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    let mask = sim_gpio_mask(pin).ok_or(SIM_ERR_INVALID_ARG)?;
    if high {
        SIM_GPIO_LEVELS.fetch_or(mask, Ordering::Relaxed);
    } else {
        SIM_GPIO_LEVELS.fetch_and(!mask, Ordering::Relaxed);
    }
    Ok(())
}

/// Level last written to `pin` by [`gpio_write`].  Pins outside the
/// simulated range read low.
#[cfg(not(target_os = "espidf"))]
pub fn sim_gpio_level(pin: i32) -> bool {
    sim_gpio_mask(pin).is_some_and(|mask| SIM_GPIO_LEVELS.load(Ordering::Relaxed) & mask != 0)
}

// ── UART ─────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_uart(baud: u32) -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: baud as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    let ret = unsafe { uart_param_config(pins::TELEMETRY_UART, &cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    let ret = unsafe {
        uart_set_pin(
            pins::TELEMETRY_UART,
            pins::UART_TX_GPIO,
            pins::UART_RX_GPIO,
            UART_PIN_NO_CHANGE,
            UART_PIN_NO_CHANGE,
        )
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    let ret = unsafe {
        uart_driver_install(
            pins::TELEMETRY_UART,
            pins::UART_RX_BUFFER,
            pins::UART_TX_BUFFER,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    info!("hw_init: UART{} @ {} baud", pins::TELEMETRY_UART, baud);
    Ok(())
}

/// Queue `bytes` on the telemetry UART.  `uart_write_bytes` blocks while
/// the TX ring buffer is full, so this returns only once every byte has
/// been accepted.
#[cfg(target_os = "espidf")]
pub fn uart_write(bytes: &[u8]) -> Result<(), SerialError> {
    let mut rest = bytes;
    while !rest.is_empty() {
        // SAFETY: the driver was installed in init_uart(); the pointer and
        // length describe a live slice.
        let n = unsafe {
            uart_write_bytes(pins::TELEMETRY_UART, rest.as_ptr().cast(), rest.len())
        };
        if n < 0 {
            return Err(SerialError::WriteFailed(n));
        }
        rest = &rest[n as usize..];
    }
    Ok(())
}
