//! Indicator LEDs driven through a [`Bus`].
//!
//! Each LED is one bit of the indicator bus (see [`pins::INDICATOR_GPIOS`]).
//! Logic works in "on/off"; the bank maps that to line levels according to
//! the board's polarity.
//!
//! [`pins::INDICATOR_GPIOS`]: crate::pins::INDICATOR_GPIOS

use embedded_hal::digital::PinState;

use crate::app::ports::Gpio;
use crate::drivers::bus::Bus;
use crate::drivers::pin::PinId;
use crate::error::BusError;

/// Bit position of each LED on the indicator bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Led {
    /// Liveness blink, independent of the link.
    Blink = 0,
    /// Telemetry activity; held off while no peer is connected.
    Status = 1,
}

pub struct IndicatorBank<G: Gpio> {
    bus: Bus<G>,
    active_low: bool,
}

impl<G: Gpio + Clone> IndicatorBank<G> {
    /// Build the bank over `[blink, status]` and switch every LED off.
    pub fn new(gpio: G, ids: [PinId; 2], active_low: bool) -> Result<Self, BusError> {
        let mut bus = Bus::new(gpio, &ids)?;
        bus.output(if active_low { bus.mask() } else { 0 });
        Ok(Self { bus, active_low })
    }
}

impl<G: Gpio> IndicatorBank<G> {
    pub fn set(&mut self, led: Led, on: bool) {
        let level = self.level_for(on);
        self.bus[led as usize].write(level);
    }

    pub fn on(&mut self, led: Led) {
        self.set(led, true);
    }

    pub fn off(&mut self, led: Led) {
        self.set(led, false);
    }

    /// Invert one LED; returns whether it is now lit.
    pub fn toggle(&mut self, led: Led) -> bool {
        let level = self.bus[led as usize].toggle();
        self.is_lit(level)
    }

    pub fn is_on(&mut self, led: Led) -> bool {
        let level = self.bus[led as usize].read();
        self.is_lit(level)
    }

    pub fn all_off(&mut self) {
        let value = if self.active_low { self.bus.mask() } else { 0 };
        self.bus.write(value);
    }

    /// Lit LEDs as a bit pattern (bit = [`Led`] discriminant).
    pub fn pattern(&mut self) -> u32 {
        let raw = self.bus.read();
        if self.active_low { !raw & self.bus.mask() } else { raw }
    }

    fn level_for(&self, on: bool) -> PinState {
        PinState::from(on != self.active_low)
    }

    fn is_lit(&self, level: PinState) -> bool {
        (level == PinState::High) != self.active_low
    }
}
