//! Pin collector: a group of digital lines read and written as one word.
//!
//! Bit *i* of every value maps to the *i*-th pin in construction order, so
//! consumers (indicator bank, select lines, digital sensor groups) address
//! lines by bit position only and never by GPIO number.
//!
//! ```text
//!   ids = [18, 19, 21]        value = 0b101
//!          │   │   └── bit 2 ──────────┘││
//!          │   └────── bit 1 ───────────┘│
//!          └────────── bit 0 ────────────┘
//! ```
//!
//! The width is checked once at construction: a bus wider than the `u32`
//! word is refused rather than silently truncated.

use core::ops::{Index, IndexMut};

use embedded_hal::digital::PinState;
use heapless::Vec;

use crate::app::ports::Gpio;
use crate::drivers::pin::{Pin, PinId, Pull};
use crate::error::BusError;

/// Widest bus a `u32` word can address.
pub const BUS_MAX_WIDTH: usize = u32::BITS as usize;

pub struct Bus<G: Gpio> {
    pins: Vec<Pin<G>, BUS_MAX_WIDTH>,
}

impl<G: Gpio + Clone> Bus<G> {
    /// Collect `ids` (bit 0 first) into a bus.  Pins start unconfigured.
    pub fn new(gpio: G, ids: &[PinId]) -> Result<Self, BusError> {
        if ids.is_empty() {
            return Err(BusError::Empty);
        }
        if ids.len() > BUS_MAX_WIDTH {
            return Err(BusError::TooWide {
                requested: ids.len(),
                max: BUS_MAX_WIDTH,
            });
        }

        let mut pins = Vec::new();
        for (i, &id) in ids.iter().enumerate() {
            if ids[..i].contains(&id) {
                return Err(BusError::DuplicatePin(id));
            }
            // Length was checked above.
            let _ = pins.push(Pin::new(gpio.clone(), id));
        }
        Ok(Self { pins })
    }
}

impl<G: Gpio> Bus<G> {
    /// Number of pins (the bus width).
    pub fn count(&self) -> usize {
        self.pins.len()
    }

    /// All-ones value for this width.
    pub fn mask(&self) -> u32 {
        if self.pins.len() == BUS_MAX_WIDTH {
            u32::MAX
        } else {
            (1u32 << self.pins.len()) - 1
        }
    }

    /// Configure every pin as output and drive `default`.
    pub fn output(&mut self, default: u32) {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            pin.output(bit_level(default, i));
        }
    }

    /// Configure every pin as input with `pull`.
    pub fn input(&mut self, pull: Pull) {
        for pin in &mut self.pins {
            pin.input(pull);
        }
    }

    /// Drive pin *i* with bit *i* of `value`.  Bits beyond the width are ignored.
    pub fn write(&mut self, value: u32) {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            pin.write(bit_level(value, i));
        }
    }

    /// Gather bit *i* from pin *i*.
    pub fn read(&mut self) -> u32 {
        self.pins
            .iter_mut()
            .enumerate()
            .fold(0, |acc, (i, pin)| match pin.read() {
                PinState::High => acc | (1 << i),
                PinState::Low => acc,
            })
    }

    pub fn pin(&self, index: usize) -> Result<&Pin<G>, BusError> {
        let count = self.pins.len();
        self.pins
            .get(index)
            .ok_or(BusError::IndexOutOfRange { index, count })
    }

    pub fn pin_mut(&mut self, index: usize) -> Result<&mut Pin<G>, BusError> {
        let count = self.pins.len();
        self.pins
            .get_mut(index)
            .ok_or(BusError::IndexOutOfRange { index, count })
    }
}

impl<G: Gpio> Index<usize> for Bus<G> {
    type Output = Pin<G>;

    fn index(&self, index: usize) -> &Pin<G> {
        match self.pin(index) {
            Ok(pin) => pin,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<G: Gpio> IndexMut<usize> for Bus<G> {
    fn index_mut(&mut self, index: usize) -> &mut Pin<G> {
        match self.pin_mut(index) {
            Ok(pin) => pin,
            Err(e) => panic!("{e}"),
        }
    }
}

fn bit_level(value: u32, bit: usize) -> PinState {
    PinState::from(value & (1 << bit) != 0)
}
