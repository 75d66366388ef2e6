//! One-shot hardware peripheral initialization and raw register helpers.
//!
//! Configures the ADC1 oneshot unit for every analog input using raw
//! ESP-IDF sys calls, and exposes the thin GPIO/ADC accessors the hardware
//! adapter builds on.  `init_peripherals()` is called once from `main()`
//! before the loop starts.
//!
//! On host targets every accessor is an inert stub; tests use the
//! simulation adapters instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use embedded_hal::digital::PinState;

use crate::drivers::pin::{PinId, Pull};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the loop; single-threaded.
    unsafe {
        init_adc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    // Oneshot mode on the S3 converts at 12 bits only; reads are narrowed
    // to 10-bit counts in `adc1_read`.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for &channel in &pins::ANALOG_CHANNELS {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!("hw_init: ADC1 configured ({} inputs)", pins::ANALOG_CHANNELS.len());
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    ten_bit_counts(raw)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    0
}

/// Narrow a 12-bit conversion result to the node's 10-bit count scale
/// (0..=1023, 3.6 V full scale at 12 dB).
pub fn ten_bit_counts(raw12: i32) -> u16 {
    (raw12.clamp(0, 4095) >> 2) as u16
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_configure_output(pin: PinId, level: PinState) {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: plain config struct; main-loop only.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        log::error!("hw_init: output config for GPIO{} failed (rc={})", pin, ret);
        return;
    }
    gpio_write(pin, level);
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_configure_output(_pin: PinId, _level: PinState) {}

#[cfg(target_os = "espidf")]
pub fn gpio_configure_input(pin: PinId, pull: Pull) {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: if pull == Pull::Up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: if pull == Pull::Down {
            gpio_pulldown_t_GPIO_PULLDOWN_ENABLE
        } else {
            gpio_pulldown_t_GPIO_PULLDOWN_DISABLE
        },
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: plain config struct; main-loop only.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        log::error!("hw_init: input config for GPIO{} failed (rc={})", pin, ret);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_configure_input(_pin: PinId, _pull: Pull) {}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: PinId) -> PinState {
    // SAFETY: gpio_get_level is a read-only register access on a
    // configured pin; safe to call from main context.
    PinState::from((unsafe { gpio_get_level(pin as i32) }) != 0)
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: PinId) -> PinState {
    PinState::Low
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: PinId, level: PinState) {
    // SAFETY: gpio_set_level writes to a configured output pin. Main-loop only.
    unsafe {
        gpio_set_level(pin as i32, u32::from(level == PinState::High));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: PinId, _level: PinState) {}
