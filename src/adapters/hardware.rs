//! Hardware adapter: bridges the ESP32 peripherals to the port traits.
//!
//! Both handles are zero-sized: every [`Pin`](crate::drivers::pin::Pin)
//! and the analog sampler hold their own copy and go through the raw
//! accessors in [`hw_init`].  This is the only module that reaches real
//! registers.  On non-espidf targets the accessors are inert stubs, so the
//! adapter compiles but reads back zeros.

use embedded_hal::digital::PinState;

use crate::app::ports::{Adc, Gpio};
use crate::drivers::hw_init;
use crate::drivers::pin::{PinId, Pull};
use crate::pins;

/// GPIO matrix access.
#[derive(Debug, Clone, Copy, Default)]
pub struct EspGpio;

impl Gpio for EspGpio {
    fn configure_output(&mut self, pin: PinId, level: PinState) {
        hw_init::gpio_configure_output(pin, level);
    }

    fn configure_input(&mut self, pin: PinId, pull: Pull) {
        hw_init::gpio_configure_input(pin, pull);
    }

    fn set_level(&mut self, pin: PinId, level: PinState) {
        hw_init::gpio_write(pin, level);
    }

    fn level(&mut self, pin: PinId) -> PinState {
        hw_init::gpio_read(pin)
    }
}

// ── ADC ───────────────────────────────────────────────────────

/// ADC1 oneshot unit behind the board's analog channel map.
///
/// Logical channel `n` is `pins::ANALOG_CHANNELS[n]` on the unit.
/// Selection is just bookkeeping; the oneshot driver routes the mux as
/// part of each conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct EspAdc {
    selected: Option<u8>,
}

impl EspAdc {
    pub fn new() -> Self {
        Self { selected: None }
    }
}

impl Adc for EspAdc {
    fn channel_count(&self) -> u8 {
        pins::ANALOG_CHANNEL_COUNT
    }

    fn select_channel(&mut self, channel: u8) {
        self.selected = Some(channel);
    }

    fn read(&mut self) -> u16 {
        match self
            .selected
            .and_then(|ch| pins::ANALOG_CHANNELS.get(usize::from(ch)))
        {
            Some(&channel) => hw_init::adc1_read(channel),
            None => 0,
        }
    }
}
