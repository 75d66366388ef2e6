//! Unified error types for the sensor node firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! startup path's error handling uniform.  All variants are `Copy` so they
//! travel through events and logs without allocation.
//!
//! Two fault classes deliberately have no variant here:
//!
//! - **HardwareFault** (pin/bus/sampler used against its configured
//!   direction) is a contract violation and panics at the call site.
//! - **WatchdogStarvation** cannot be observed by software; the device
//!   resets.

use core::fmt;

use crate::drivers::pin::PinId;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible structural operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A bus could not be constructed.
    Bus(BusError),
    /// A configuration value or message was rejected.
    Config(ConfigError),
    /// The transport reported a failure.
    Link(LinkError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// A bus needs at least one pin.
    Empty,
    /// More pins than bits in the bus word (resource exhaustion).
    TooWide { requested: usize, max: usize },
    /// The same pin appears twice in the construction list.
    DuplicatePin(PinId),
    /// `pin(index)` was asked for a position the bus does not have.
    IndexOutOfRange { index: usize, count: usize },
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "bus has no pins"),
            Self::TooWide { requested, max } => {
                write!(f, "{requested} pins exceed the {max}-bit bus word")
            }
            Self::DuplicatePin(id) => write!(f, "pin {id} listed twice"),
            Self::IndexOutOfRange { index, count } => {
                write!(f, "pin index {index} out of range (count {count})")
            }
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Malformed or unacceptable configuration.
///
/// Inbound message problems are dropped at the transport boundary and never
/// reach scheduler state; `NodeConfig` problems fail startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Frame header announced an impossible payload length.
    BadFrame,
    /// Payload did not decode as a sensor configuration.
    Decode,
    /// Analog channel beyond the board's multiplexer.
    ChannelOutOfRange { channel: u8, max: u8 },
    /// Digital pin beyond the board's GPIO range.
    PinOutOfRange { pin: PinId, max: PinId },
    /// Digital pin is owned by an indicator line.
    PinReserved(PinId),
    /// A `NodeConfig` field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadFrame => write!(f, "malformed frame"),
            Self::Decode => write!(f, "payload decode failed"),
            Self::ChannelOutOfRange { channel, max } => {
                write!(f, "analog channel {channel} out of range (max {max})")
            }
            Self::PinOutOfRange { pin, max } => {
                write!(f, "pin {pin} out of range (max {max})")
            }
            Self::PinReserved(pin) => write!(f, "pin {pin} is reserved"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The outbound frame did not fit the encode buffer.
    FrameTooLarge,
    /// The transport rejected a read or write.
    Io,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameTooLarge => write!(f, "frame too large"),
            Self::Io => write!(f, "transport I/O error"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nests_subsystem_message() {
        let e: Error = BusError::TooWide { requested: 33, max: 32 }.into();
        assert_eq!(e.to_string(), "bus: 33 pins exceed the 32-bit bus word");

        let e: Error = ConfigError::PinReserved(11).into();
        assert_eq!(e.to_string(), "config: pin 11 is reserved");
    }
}
