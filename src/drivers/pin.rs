//! Single digital line.
//!
//! A [`Pin`] owns a clone of the injected [`Gpio`] handle plus the direction
//! it was last configured with.  Direction is fixed by each `output()` /
//! `input()` call until the next one.
//!
//! Using a pin against its direction is a *hardware fault*.  That is a
//! programming error, not a runtime condition, so it panics:
//!
//! | Operation  | Unconfigured | Input | Output            |
//! |------------|--------------|-------|-------------------|
//! | `read()`   | fault        | pad   | driven level      |
//! | `write()`  | fault        | fault | drive             |
//! | `toggle()` | fault        | fault | drive `!level`    |

use embedded_hal::digital::PinState;
use serde::{Deserialize, Serialize};

use crate::app::ports::Gpio;

/// GPIO number.
pub type PinId = u8;

/// Input pull resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Configured direction of a [`Pin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Unconfigured,
    Input(Pull),
    Output,
}

pub struct Pin<G: Gpio> {
    gpio: G,
    id: PinId,
    direction: Direction,
    /// Last driven level (outputs only).
    level: PinState,
}

impl<G: Gpio> Pin<G> {
    /// Bind to `id` without touching the hardware.
    pub fn new(gpio: G, id: PinId) -> Self {
        Self {
            gpio,
            id,
            direction: Direction::Unconfigured,
            level: PinState::Low,
        }
    }

    pub fn id(&self) -> PinId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Configure as output, driving `default` immediately.
    pub fn output(&mut self, default: PinState) {
        self.gpio.configure_output(self.id, default);
        self.direction = Direction::Output;
        self.level = default;
    }

    /// Configure as input with the given pull.
    pub fn input(&mut self, pull: Pull) {
        self.gpio.configure_input(self.id, pull);
        self.direction = Direction::Input(pull);
    }

    /// Current level: the pad for inputs, the driven level for outputs.
    pub fn read(&mut self) -> PinState {
        match self.direction {
            Direction::Input(_) => self.gpio.level(self.id),
            Direction::Output => self.level,
            Direction::Unconfigured => {
                panic!("hardware fault: pin {} read before configuration", self.id)
            }
        }
    }

    /// Drive the line.
    pub fn write(&mut self, level: PinState) {
        assert!(
            self.direction == Direction::Output,
            "hardware fault: pin {} written while {:?}",
            self.id,
            self.direction
        );
        self.gpio.set_level(self.id, level);
        self.level = level;
    }

    /// Invert the driven level and return the new one.
    pub fn toggle(&mut self) -> PinState {
        let next = !self.level;
        self.write(next);
        next
    }

    pub fn is_high(&mut self) -> bool {
        self.read() == PinState::High
    }
}
