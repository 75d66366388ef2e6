//! Polling timeout gate.
//!
//! Elapsed time is `now.wrapping_sub(origin)` on the `u32` millisecond
//! counter, so a reset just before the counter wraps still expires on time.
//! Once expired the gate stays expired until [`Timeout::reset`], even if
//! the counter laps the origin again.
//!
//! No callbacks, no interrupts: the loop asks, the gate answers.

use core::cell::Cell;

use crate::app::ports::Clock;

pub struct Timeout<C: Clock> {
    clock: C,
    origin: u32,
    duration_ms: u32,
    expired: Cell<bool>,
}

impl<C: Clock> Timeout<C> {
    /// Start a gate of `duration_ms`, origin = now.
    pub fn new(clock: C, duration_ms: u32) -> Self {
        let origin = clock.now_ms();
        Self {
            clock,
            origin,
            duration_ms,
            expired: Cell::new(false),
        }
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Milliseconds since the last reset (modulo 2³²).
    pub fn elapsed_ms(&self) -> u32 {
        self.clock.now_ms().wrapping_sub(self.origin)
    }

    /// True from the moment `duration_ms` has elapsed until the next reset.
    pub fn is_expired(&self) -> bool {
        if !self.expired.get() && self.elapsed_ms() >= self.duration_ms {
            self.expired.set(true);
        }
        self.expired.get()
    }

    /// Rebase the origin to now.
    pub fn reset(&mut self) {
        self.origin = self.clock.now_ms();
        self.expired.set(false);
    }

    /// Reset with a new duration.
    pub fn restart(&mut self, duration_ms: u32) {
        self.duration_ms = duration_ms;
        self.reset();
    }
}
