//! Digital level sampling.
//!
//! The selected line is (re)configured as an input with the board's pull
//! on every sample, then read once.  High reads as 1, low as 0.

use embedded_hal::digital::PinState;

use crate::app::ports::Gpio;
use crate::drivers::pin::{Pin, PinId, Pull};
use crate::sensors::SampledValue;

pub fn sample_level<G: Gpio>(gpio: G, id: PinId, pull: Pull, now_ms: u32) -> SampledValue {
    let mut pin = Pin::new(gpio, id);
    pin.input(pull);
    let raw = match pin.read() {
        PinState::High => 1,
        PinState::Low => 0,
    };
    SampledValue {
        timestamp_ms: now_ms,
        raw,
        scaled: f32::from(raw),
    }
}
