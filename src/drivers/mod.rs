//! Pin-level drivers, timing primitives, and hardware initialisation.

pub mod bus;
pub mod hw_init;
pub mod indicator;
pub mod pin;
pub mod timeout;
pub mod watchdog;
