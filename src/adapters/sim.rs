//! Host simulation adapters.
//!
//! In-memory stand-ins for the GPIO bank, the multiplexed ADC and the tick
//! counter.  Each handle is a cheap `Rc` clone over shared state, so a test
//! keeps one clone to drive inputs and inspect outputs while the drivers
//! own the others.
//!
//! Compiled on every non-ESP target; never on hardware.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::digital::PinState;

use crate::app::ports::{Adc, Clock, Gpio};
use crate::drivers::pin::{Direction, PinId, Pull};

const SIM_GPIO_COUNT: usize = 64;
const SIM_ADC_CHANNELS: usize = 16;

// ── GPIO ──────────────────────────────────────────────────────

struct GpioState {
    direction: [Direction; SIM_GPIO_COUNT],
    /// Level driven by the pin itself (outputs).
    driven: [PinState; SIM_GPIO_COUNT],
    /// Level forced onto the pad from outside (inputs), if any.
    external: [Option<PinState>; SIM_GPIO_COUNT],
}

/// Simulated GPIO bank.
#[derive(Clone)]
pub struct SimGpio {
    state: Rc<RefCell<GpioState>>,
}

impl Default for SimGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl SimGpio {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(GpioState {
                direction: [Direction::Unconfigured; SIM_GPIO_COUNT],
                driven: [PinState::Low; SIM_GPIO_COUNT],
                external: [None; SIM_GPIO_COUNT],
            })),
        }
    }

    /// Force the pad of `pin` from outside (what an input would see).
    pub fn drive(&self, pin: PinId, level: PinState) {
        self.state.borrow_mut().external[usize::from(pin)] = Some(level);
    }

    /// Stop forcing `pin`; it floats to its pull.
    pub fn release(&self, pin: PinId) {
        self.state.borrow_mut().external[usize::from(pin)] = None;
    }

    /// Level on the pad right now.
    pub fn level_of(&self, pin: PinId) -> PinState {
        let s = self.state.borrow();
        let i = usize::from(pin);
        match s.direction[i] {
            Direction::Output => s.driven[i],
            Direction::Input(pull) => s.external[i].unwrap_or(match pull {
                Pull::Up => PinState::High,
                Pull::Down | Pull::None => PinState::Low,
            }),
            Direction::Unconfigured => s.external[i].unwrap_or(PinState::Low),
        }
    }

    pub fn direction_of(&self, pin: PinId) -> Direction {
        self.state.borrow().direction[usize::from(pin)]
    }
}

impl Gpio for SimGpio {
    fn configure_output(&mut self, pin: PinId, level: PinState) {
        let mut s = self.state.borrow_mut();
        s.direction[usize::from(pin)] = Direction::Output;
        s.driven[usize::from(pin)] = level;
    }

    fn configure_input(&mut self, pin: PinId, pull: Pull) {
        self.state.borrow_mut().direction[usize::from(pin)] = Direction::Input(pull);
    }

    fn set_level(&mut self, pin: PinId, level: PinState) {
        self.state.borrow_mut().driven[usize::from(pin)] = level;
    }

    fn level(&mut self, pin: PinId) -> PinState {
        self.level_of(pin)
    }
}

// ── ADC ───────────────────────────────────────────────────────

struct AdcState {
    channels: u8,
    raw: [u16; SIM_ADC_CHANNELS],
    selected: Option<u8>,
    reads: u32,
}

/// Simulated multiplexed ADC.
#[derive(Clone)]
pub struct SimAdc {
    state: Rc<RefCell<AdcState>>,
}

impl SimAdc {
    /// An ADC with `channels` inputs (at most 16), all reading 0.
    pub fn new(channels: u8) -> Self {
        Self {
            state: Rc::new(RefCell::new(AdcState {
                channels: channels.min(SIM_ADC_CHANNELS as u8),
                raw: [0; SIM_ADC_CHANNELS],
                selected: None,
                reads: 0,
            })),
        }
    }

    /// Value the converter returns for `channel`.
    pub fn set_raw(&self, channel: u8, raw: u16) {
        self.state.borrow_mut().raw[usize::from(channel)] = raw;
    }

    pub fn selected(&self) -> Option<u8> {
        self.state.borrow().selected
    }

    pub fn read_count(&self) -> u32 {
        self.state.borrow().reads
    }
}

impl Adc for SimAdc {
    fn channel_count(&self) -> u8 {
        self.state.borrow().channels
    }

    fn select_channel(&mut self, channel: u8) {
        self.state.borrow_mut().selected = Some(channel);
    }

    fn read(&mut self) -> u16 {
        let mut s = self.state.borrow_mut();
        s.reads += 1;
        match s.selected {
            Some(ch) => s.raw[usize::from(ch)],
            None => 0,
        }
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Manually advanced millisecond counter.
#[derive(Clone, Default)]
pub struct SimClock {
    now: Rc<Cell<u32>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the counter at `ms` (useful near `u32::MAX`).
    pub fn starting_at(ms: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(ms)),
        }
    }

    /// Move time forward, wrapping like the hardware counter.
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
