//! Application boundary: ports and events.
//!
//! The scheduler and drivers never touch registers directly.  All
//! interaction with hardware and with the wireless stack happens through
//! the **port traits** defined in [`ports`], keeping the core fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
