//! Port traits: the boundary between the control core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Scheduler (domain)
//! ```
//!
//! Hardware access is an injected capability: the drivers in
//! [`crate::drivers`] and the [`Scheduler`](crate::scheduler::Scheduler)
//! are generic over these traits, so host tests substitute simulated GPIO,
//! ADC and clock state for real registers.
//!
//! GPIO/ADC/clock handles are expected to be cheap to clone (a ZST on
//! ESP-IDF, a shared `Rc` in simulation); every [`Pin`](crate::drivers::pin::Pin)
//! owns its own clone.

use embedded_hal::digital::PinState;

use crate::app::events::NodeEvent;
use crate::config::SensorConfig;
use crate::drivers::pin::{PinId, Pull};
use crate::error::ConfigError;

// ───────────────────────────────────────────────────────────────
// GPIO port (register access for individual lines)
// ───────────────────────────────────────────────────────────────

/// Raw digital-line access.  Direction bookkeeping lives in
/// [`Pin`](crate::drivers::pin::Pin); this trait only touches hardware.
pub trait Gpio {
    /// Configure `pin` as a push-pull output driving `level`.
    fn configure_output(&mut self, pin: PinId, level: PinState);

    /// Configure `pin` as an input with the given pull resistor.
    fn configure_input(&mut self, pin: PinId, pull: Pull);

    /// Drive an output pin.
    fn set_level(&mut self, pin: PinId, level: PinState);

    /// Sample the pad level of `pin`.
    fn level(&mut self, pin: PinId) -> PinState;
}

// ───────────────────────────────────────────────────────────────
// ADC port (shared, multiplexed converter)
// ───────────────────────────────────────────────────────────────

/// A single converter behind a channel multiplexer.
pub trait Adc {
    /// Number of selectable channels (`0..channel_count()`).
    fn channel_count(&self) -> u8;

    /// Route `channel` to the converter.
    fn select_channel(&mut self, channel: u8);

    /// Sample-and-hold the selected channel.  Bounded hardware latency.
    fn read(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond tick counter.  Wraps at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Watchdog port
// ───────────────────────────────────────────────────────────────

/// Handle the scheduler feeds once, last, on every tick.
pub trait WatchdogPort {
    fn feed(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Collaborators owned by the wireless stack
// ───────────────────────────────────────────────────────────────

/// One non-blocking step of the connection-parameter handshake.
///
/// Must be safe to call every tick regardless of connection state.
pub trait Negotiator {
    fn advance(&mut self);
}

/// Consumes raw inbound bytes and yields a complete [`SensorConfig`].
///
/// Partial messages stay buffered inside the handler; they are never
/// partially applied.
pub trait ConfigHandler {
    /// Feed newly drained bytes.
    ///
    /// Returns `Ok(Some(cfg))` once a complete, valid message has arrived
    /// (the latest one wins if several complete in the same call),
    /// `Ok(None)` while still incomplete, and `Err` when only malformed
    /// messages completed.
    fn handle(&mut self, bytes: &[u8]) -> Result<Option<SensorConfig>, ConfigError>;

    /// Discard any partially buffered message (the peer went away).
    fn reset(&mut self) {}
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The scheduler emits structured [`NodeEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &NodeEvent);
}
